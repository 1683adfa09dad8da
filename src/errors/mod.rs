//! Error types for the tiled recurrent inference library.
//!
//! This module contains specific error types used throughout the library,
//! avoiding generic error wrappers like `anyhow` or `Box<dyn Error>` for better
//! error handling and debugging.

mod evaluation_error;
mod inference_error;
mod load_error;
mod parallel_predict_error;

pub use evaluation_error::EvaluationError;
pub use inference_error::InferenceError;
pub use load_error::LoadError;
pub use parallel_predict_error::ParallelPredictError;

/// Result type alias for shape validation, kernel and driver operations.
pub type InferenceResult<T> = std::result::Result<T, InferenceError>;

/// Result type alias for file loading and configuration operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type alias for batch-parallel prediction.
pub type ParallelPredictResult<T> = std::result::Result<T, ParallelPredictError>;

/// Result type alias for complete evaluation runs.
pub type EvaluationResult<T> = std::result::Result<T, EvaluationError>;
