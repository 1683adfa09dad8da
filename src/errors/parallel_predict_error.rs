use thiserror::Error;

use super::InferenceError;

#[derive(Error, Debug)]
pub enum ParallelPredictError {
    #[error("Thread count must be at least 1, got {count}")]
    InvalidThreadCount { count: usize },

    #[error("Sequence buffer size mismatch: expected {expected} tokens, got {actual}")]
    SequenceBufferSizeMismatch { expected: usize, actual: usize },

    #[error("Prediction failed for batch {batch_index}: {source}")]
    PredictionFailed {
        batch_index: usize,
        #[source]
        source: InferenceError,
    },

    #[error("Batch {batch_index} produced no result")]
    MissingBatch { batch_index: usize },

    #[error("Thread panicked during parallel execution")]
    ThreadPanicked,
}
