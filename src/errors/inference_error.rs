//! Error types for shape validation and inference execution.

use thiserror::Error;

/// Errors that can occur while validating a model shape or running the kernels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Invalid shape: {field} must be greater than 0")]
    InvalidShape { field: &'static str },

    #[error("Shape mismatch: {left} ({left_size}) must equal {right} ({right_size})")]
    ShapeMismatch {
        left: &'static str,
        left_size: usize,
        right: &'static str,
        right_size: usize,
    },

    #[error("The batch size {batch_size} must be a multiple of the tile size {tile_batch}")]
    TileDoesNotDivideBatch { batch_size: usize, tile_batch: usize },

    #[error("The dense input size {size} must be a power of two")]
    DenseInputNotPowerOfTwo { size: usize },

    #[error("Buffer '{buffer}' has {actual} elements, but the shape requires {expected}")]
    BufferSizeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Token {token} at sample {sample}, position {position} is outside the vocabulary of {word_num} words")]
    TokenOutOfRange {
        token: u32,
        sample: usize,
        position: usize,
        word_num: usize,
    },

    #[error("The {reference} labels hold {actual} entries, but {expected} predictions need scoring")]
    ReferenceLengthMismatch {
        reference: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("The dataset holds {sample_num} samples, fewer than one batch of {batch_size}")]
    EmptyDataset { sample_num: usize, batch_size: usize },
}
