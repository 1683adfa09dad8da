//! Evaluation dataset: token sequences plus two label sets to score against.

use log::info;

use crate::config::DatasetFiles;
use crate::errors::{InferenceResult, LoadResult};
use crate::loader::load_values;
use crate::model_parameters::check_len;
use crate::shape::ModelShape;

/// Token sequences and their labels.
///
/// `sequences` holds `sample_num` rows of `sample_len` tokens; both label sets
/// hold `sample_num` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub sequences: Vec<u32>,
    /// Labels predicted by the reference (baseline) implementation.
    pub baseline_labels: Vec<u32>,
    /// Ground-truth labels.
    pub actual_labels: Vec<u32>,
}

impl Dataset {
    pub fn new(
        shape: &ModelShape,
        sequences: Vec<u32>,
        baseline_labels: Vec<u32>,
        actual_labels: Vec<u32>,
    ) -> InferenceResult<Self> {
        check_len("sequences", shape.sequences_len(), sequences.len())?;
        check_len("baseline_labels", shape.sample_num, baseline_labels.len())?;
        check_len("actual_labels", shape.sample_num, actual_labels.len())?;
        Ok(Self {
            sequences,
            baseline_labels,
            actual_labels,
        })
    }

    /// Loads the three dataset files. Any unreadable or short file aborts the load.
    pub fn load(files: &DatasetFiles, shape: &ModelShape) -> LoadResult<Self> {
        let sequences = load_values(&files.sequences, shape.sequences_len())?;
        let baseline_labels = load_values(&files.baseline_labels, shape.sample_num)?;
        let actual_labels = load_values(&files.actual_labels, shape.sample_num)?;

        info!(
            "Loaded dataset: {} sequences of {} tokens",
            shape.sample_num, shape.sample_len
        );

        Ok(Self::new(shape, sequences, baseline_labels, actual_labels)?)
    }

    pub fn sample_count(&self) -> usize {
        self.actual_labels.len()
    }
}
