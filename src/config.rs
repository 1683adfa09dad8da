//! Run configuration: where the model and dataset files live and which shape they have.
//!
//! A configuration can be read from a JSON file. Every field is optional and
//! falls back to the layout of a Keras export next to the evaluation datasets:
//!
//! ```json
//! {
//!   "model": { "directory": "../model" },
//!   "dataset": { "sequences": "../../datasets/org_seq.txt" },
//!   "shape": { "sample_num": 1000, "sample_len": 50 },
//!   "threads": 4
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LoadError, LoadResult};
use crate::shape::ModelShape;

/// Paths of the six weight files of the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFiles {
    pub embeddings: PathBuf,
    pub rnn_bias: PathBuf,
    pub rnn_kernel: PathBuf,
    pub rnn_recurrent_kernel: PathBuf,
    pub dense_bias: PathBuf,
    pub dense_kernel: PathBuf,
}

impl ModelFiles {
    /// Standard file names of a Keras `Embedding → SimpleRNN → Dense` export in `directory`.
    pub fn in_dir(directory: impl AsRef<Path>) -> Self {
        let directory = directory.as_ref();
        Self {
            embeddings: directory.join("embedding_1_embeddings.txt"),
            rnn_bias: directory.join("simple_rnn_1_bias.txt"),
            rnn_kernel: directory.join("simple_rnn_1_kernel.txt"),
            rnn_recurrent_kernel: directory.join("simple_rnn_1_recurrent_kernel.txt"),
            dense_bias: directory.join("dense_1_bias.txt"),
            dense_kernel: directory.join("dense_1_kernel.txt"),
        }
    }
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self::in_dir("../model")
    }
}

/// Paths of the token sequences and the two label sets they are scored against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    pub sequences: PathBuf,
    /// Labels predicted by the reference (baseline) implementation.
    pub baseline_labels: PathBuf,
    /// Ground-truth labels.
    pub actual_labels: PathBuf,
}

impl DatasetFiles {
    pub fn in_dir(directory: impl AsRef<Path>) -> Self {
        let directory = directory.as_ref();
        Self {
            sequences: directory.join("org_seq.txt"),
            baseline_labels: directory.join("rnn_result.txt"),
            actual_labels: directory.join("actual_result.txt"),
        }
    }
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self::in_dir("../../datasets")
    }
}

/// Model location as written in a configuration file: either a directory with
/// the standard file names or every file spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSource {
    Directory { directory: PathBuf },
    Files(ModelFiles),
}

impl ModelSource {
    pub fn files(&self) -> ModelFiles {
        match self {
            ModelSource::Directory { directory } => ModelFiles::in_dir(directory),
            ModelSource::Files(files) => files.clone(),
        }
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::Files(ModelFiles::default())
    }
}

/// Everything the evaluation binary needs to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model: ModelSource,
    pub dataset: DatasetFiles,
    pub shape: ModelShape,
    /// Worker threads for batch-parallel prediction; `None` runs sequentially.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl RunConfig {
    /// Reads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            serde_json::from_str(&contents).map_err(|source| LoadError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        config.shape.validate()?;
        Ok(config)
    }

    pub fn model_files(&self) -> ModelFiles {
        self.model.files()
    }
}
