//! Top-level error of a full evaluation run.

use thiserror::Error;

use super::{InferenceError, LoadError, ParallelPredictError};

/// Any failure between reading the configuration and printing the accuracy.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    ParallelPredict(#[from] ParallelPredictError),
}
