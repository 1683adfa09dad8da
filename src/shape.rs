//! The fixed shape contract shared by the kernels, the driver and the loaders.
//!
//! Every buffer in the pipeline has a size derived from a [`ModelShape`]. The
//! shape is fixed before any file is read and validated once; kernels then
//! check their borrowed buffers against it at entry instead of trusting callers.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{InferenceError, InferenceResult};

/// Shape constants of the classifier.
///
/// Missing fields in a JSON configuration fall back to the values in [`constants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelShape {
    pub word_num: usize,
    pub word_size: usize,
    pub rnn_input_size: usize,
    pub rnn_state_size: usize,
    pub rnn_batch_size: usize,
    pub fc_input_size: usize,
    pub fc_output_size: usize,
    pub fc_batch_size: usize,
    pub sm_batch_size: usize,
    pub sm_class_size: usize,
    pub tile_batch: usize,
    pub sample_num: usize,
    pub sample_len: usize,
}

impl Default for ModelShape {
    fn default() -> Self {
        Self {
            word_num: constants::WORD_NUM,
            word_size: constants::WORD_SIZE,
            rnn_input_size: constants::RNN_INPUT_SIZE,
            rnn_state_size: constants::RNN_STATE_SIZE,
            rnn_batch_size: constants::RNN_BATCH_SIZE,
            fc_input_size: constants::FC_INPUT_SIZE,
            fc_output_size: constants::FC_OUTPUT_SIZE,
            fc_batch_size: constants::FC_BATCH_SIZE,
            sm_batch_size: constants::SM_BATCH_SIZE,
            sm_class_size: constants::SM_CLASS_SIZE,
            tile_batch: constants::TILE_BATCH,
            sample_num: constants::SAMPLE_NUM,
            sample_len: constants::SAMPLE_LEN,
        }
    }
}

impl ModelShape {
    /// Builds a consistent shape from the independent dimensions.
    ///
    /// Derived sizes (`rnn_input_size`, `fc_input_size`, the three batch sizes and
    /// `sm_class_size`) are filled in so the result always passes [`validate`](Self::validate)
    /// when the arguments themselves are valid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        word_num: usize,
        word_size: usize,
        state_size: usize,
        class_size: usize,
        batch_size: usize,
        tile_batch: usize,
        sample_num: usize,
        sample_len: usize,
    ) -> Self {
        Self {
            word_num,
            word_size,
            rnn_input_size: word_size,
            rnn_state_size: state_size,
            rnn_batch_size: batch_size,
            fc_input_size: state_size,
            fc_output_size: class_size,
            fc_batch_size: batch_size,
            sm_batch_size: batch_size,
            sm_class_size: class_size,
            tile_batch,
            sample_num,
            sample_len,
        }
    }

    /// Checks that the shape describes one consistent embedding → RNN → dense pipeline.
    pub fn validate(&self) -> InferenceResult<()> {
        let positive = [
            ("word_num", self.word_num),
            ("word_size", self.word_size),
            ("rnn_input_size", self.rnn_input_size),
            ("rnn_state_size", self.rnn_state_size),
            ("rnn_batch_size", self.rnn_batch_size),
            ("fc_input_size", self.fc_input_size),
            ("fc_output_size", self.fc_output_size),
            ("fc_batch_size", self.fc_batch_size),
            ("sm_batch_size", self.sm_batch_size),
            ("sm_class_size", self.sm_class_size),
            ("tile_batch", self.tile_batch),
            ("sample_len", self.sample_len),
        ];
        for (field, size) in positive {
            if size == 0 {
                return Err(InferenceError::InvalidShape { field });
            }
        }

        let links = [
            ("word_size", self.word_size, "rnn_input_size", self.rnn_input_size),
            ("rnn_state_size", self.rnn_state_size, "fc_input_size", self.fc_input_size),
            ("fc_batch_size", self.fc_batch_size, "rnn_batch_size", self.rnn_batch_size),
            ("sm_batch_size", self.sm_batch_size, "fc_batch_size", self.fc_batch_size),
            ("sm_class_size", self.sm_class_size, "fc_output_size", self.fc_output_size),
        ];
        for (left, left_size, right, right_size) in links {
            if left_size != right_size {
                return Err(InferenceError::ShapeMismatch {
                    left,
                    left_size,
                    right,
                    right_size,
                });
            }
        }

        if !self.rnn_batch_size.is_multiple_of(self.tile_batch) {
            return Err(InferenceError::TileDoesNotDivideBatch {
                batch_size: self.rnn_batch_size,
                tile_batch: self.tile_batch,
            });
        }

        if !self.fc_input_size.is_power_of_two() {
            return Err(InferenceError::DenseInputNotPowerOfTwo {
                size: self.fc_input_size,
            });
        }

        Ok(())
    }

    /// Width of the concatenated input/state product vector reduced per recurrent output.
    pub fn recurrent_reduction_width(&self) -> usize {
        self.rnn_input_size + self.rnn_state_size
    }

    /// Number of full batches in the dataset; a trailing partial batch is not evaluated.
    pub fn batch_count(&self) -> usize {
        self.sample_num / self.fc_batch_size
    }

    /// Number of samples that are actually classified and scored.
    pub fn evaluated_samples(&self) -> usize {
        self.batch_count() * self.rnn_batch_size
    }

    pub fn embedding_len(&self) -> usize {
        self.word_num * self.word_size
    }

    pub fn rnn_kernel_len(&self) -> usize {
        self.rnn_input_size * self.rnn_state_size
    }

    pub fn rnn_recurrent_kernel_len(&self) -> usize {
        self.rnn_state_size * self.rnn_state_size
    }

    pub fn fc_kernel_len(&self) -> usize {
        self.fc_input_size * self.fc_output_size
    }

    pub fn state_len(&self) -> usize {
        self.rnn_batch_size * self.rnn_state_size
    }

    pub fn input_state_len(&self) -> usize {
        self.rnn_batch_size * self.rnn_input_size
    }

    pub fn fc_output_len(&self) -> usize {
        self.fc_batch_size * self.fc_output_size
    }

    /// Number of tokens in one batch of sequences.
    pub fn batch_tokens_len(&self) -> usize {
        self.rnn_batch_size * self.sample_len
    }

    /// Number of tokens in the whole dataset.
    pub fn sequences_len(&self) -> usize {
        self.sample_num * self.sample_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape_is_valid() {
        let shape = ModelShape::default();
        assert!(shape.validate().is_ok());
        assert_eq!(shape.recurrent_reduction_width(), 228);
        assert_eq!(shape.batch_count(), 15);
        assert_eq!(shape.evaluated_samples(), 960);
    }

    #[test]
    fn test_new_fills_derived_sizes() {
        let shape = ModelShape::new(10, 3, 4, 2, 4, 2, 8, 5);
        assert!(shape.validate().is_ok());
        assert_eq!(shape.rnn_input_size, 3);
        assert_eq!(shape.fc_input_size, 4);
        assert_eq!(shape.sm_class_size, 2);
        assert_eq!(shape.sm_batch_size, 4);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let shape = ModelShape {
            tile_batch: 0,
            ..ModelShape::default()
        };
        assert_eq!(
            shape.validate(),
            Err(InferenceError::InvalidShape { field: "tile_batch" })
        );
    }

    #[test]
    fn test_state_and_dense_input_must_agree() {
        let shape = ModelShape {
            fc_input_size: 64,
            ..ModelShape::default()
        };
        assert!(matches!(
            shape.validate(),
            Err(InferenceError::ShapeMismatch {
                left: "rnn_state_size",
                ..
            })
        ));
    }

    #[test]
    fn test_tile_must_divide_batch() {
        let shape = ModelShape {
            tile_batch: 24,
            ..ModelShape::default()
        };
        assert_eq!(
            shape.validate(),
            Err(InferenceError::TileDoesNotDivideBatch {
                batch_size: 64,
                tile_batch: 24
            })
        );
    }

    #[test]
    fn test_dense_input_must_be_power_of_two() {
        let shape = ModelShape::new(10, 3, 6, 2, 4, 2, 8, 5);
        assert_eq!(
            shape.validate(),
            Err(InferenceError::DenseInputNotPowerOfTwo { size: 6 })
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let shape: ModelShape =
            serde_json::from_str(r#"{ "sample_num": 128, "sample_len": 10 }"#).unwrap();
        assert_eq!(shape.sample_num, 128);
        assert_eq!(shape.sample_len, 10);
        assert_eq!(shape.rnn_state_size, constants::RNN_STATE_SIZE);
        assert_eq!(shape.batch_count(), 2);
    }
}
