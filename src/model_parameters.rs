//! Immutable parameters of the classifier.
//!
//! [`ModelParameters`] is built once at startup, either from in-memory vectors
//! or from the text weight files, and is then only borrowed. Every buffer length
//! is checked against the [`ModelShape`] at construction so the kernels can rely
//! on it.

use log::info;

use crate::config::ModelFiles;
use crate::errors::{InferenceError, InferenceResult, LoadResult};
use crate::loader::load_values;
use crate::shape::ModelShape;

/// Weights of the simple recurrent unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentParameters {
    /// `rnn_input_size × rnn_state_size`, row-major.
    pub kernel: Vec<f32>,
    /// `rnn_state_size × rnn_state_size`, row-major.
    pub recurrent_kernel: Vec<f32>,
    /// `rnn_state_size`.
    pub bias: Vec<f32>,
}

/// Weights of the dense projection.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseParameters {
    /// `fc_input_size × fc_output_size`, row-major.
    pub kernel: Vec<f32>,
    /// `fc_output_size`.
    pub bias: Vec<f32>,
}

/// All read-only parameters of the embedding → RNN → dense classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    shape: ModelShape,
    /// `word_num × word_size`, row-major.
    embedding: Vec<f32>,
    recurrent: RecurrentParameters,
    dense: DenseParameters,
}

impl ModelParameters {
    /// Creates the parameters after validating the shape and every buffer length.
    pub fn new(
        shape: ModelShape,
        embedding: Vec<f32>,
        recurrent: RecurrentParameters,
        dense: DenseParameters,
    ) -> InferenceResult<Self> {
        shape.validate()?;

        check_len("embedding", shape.embedding_len(), embedding.len())?;
        check_len("rnn_kernel", shape.rnn_kernel_len(), recurrent.kernel.len())?;
        check_len(
            "rnn_recurrent_kernel",
            shape.rnn_recurrent_kernel_len(),
            recurrent.recurrent_kernel.len(),
        )?;
        check_len("rnn_bias", shape.rnn_state_size, recurrent.bias.len())?;
        check_len("dense_kernel", shape.fc_kernel_len(), dense.kernel.len())?;
        check_len("dense_bias", shape.fc_output_size, dense.bias.len())?;

        Ok(Self {
            shape,
            embedding,
            recurrent,
            dense,
        })
    }

    /// Loads the six weight files. Any unreadable or short file aborts the load.
    pub fn load(files: &ModelFiles, shape: ModelShape) -> LoadResult<Self> {
        shape.validate()?;

        let embedding = load_values::<f32>(&files.embeddings, shape.embedding_len())?;
        let recurrent = RecurrentParameters {
            kernel: load_values(&files.rnn_kernel, shape.rnn_kernel_len())?,
            recurrent_kernel: load_values(
                &files.rnn_recurrent_kernel,
                shape.rnn_recurrent_kernel_len(),
            )?,
            bias: load_values(&files.rnn_bias, shape.rnn_state_size)?,
        };
        let dense = DenseParameters {
            kernel: load_values(&files.dense_kernel, shape.fc_kernel_len())?,
            bias: load_values(&files.dense_bias, shape.fc_output_size)?,
        };

        info!(
            "Loaded model: {} words x {} -> RNN {} -> dense {}",
            shape.word_num, shape.word_size, shape.rnn_state_size, shape.fc_output_size
        );

        Ok(Self::new(shape, embedding, recurrent, dense)?)
    }

    /// Parameters with every weight and bias set to zero.
    pub fn zeros(shape: ModelShape) -> InferenceResult<Self> {
        Self::new(
            shape,
            vec![0.0; shape.embedding_len()],
            RecurrentParameters {
                kernel: vec![0.0; shape.rnn_kernel_len()],
                recurrent_kernel: vec![0.0; shape.rnn_recurrent_kernel_len()],
                bias: vec![0.0; shape.rnn_state_size],
            },
            DenseParameters {
                kernel: vec![0.0; shape.fc_kernel_len()],
                bias: vec![0.0; shape.fc_output_size],
            },
        )
    }

    pub fn shape(&self) -> &ModelShape {
        &self.shape
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn recurrent(&self) -> &RecurrentParameters {
        &self.recurrent
    }

    pub fn dense(&self) -> &DenseParameters {
        &self.dense
    }

    /// Embedding vector of `token`, or `None` when it is outside the vocabulary.
    #[inline(always)]
    pub fn embedding_row(&self, token: u32) -> Option<&[f32]> {
        let token = token as usize;
        if token >= self.shape.word_num {
            return None;
        }
        let start = token * self.shape.word_size;
        Some(&self.embedding[start..start + self.shape.word_size])
    }
}

pub(crate) fn check_len(buffer: &'static str, expected: usize, actual: usize) -> InferenceResult<()> {
    if expected != actual {
        return Err(InferenceError::BufferSizeMismatch {
            buffer,
            expected,
            actual,
        });
    }
    Ok(())
}
