//! Error types for loading weight files, dataset files and run configurations.

use std::path::PathBuf;

use thiserror::Error;

use super::InferenceError;

/// Errors that can occur while reading model or dataset files.
///
/// Any of these aborts the whole load; partially filled buffers are never returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse value #{index} '{token}' in file {path}")]
    Parse {
        path: PathBuf,
        index: usize,
        token: String,
    },

    #[error("File {path} holds {actual} values, but {expected} are required")]
    TooFewValues {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
