//! Loading of flat numeric buffers from whitespace-separated text files.
//!
//! Weight and dataset files hold one decimal scalar per token, flattened
//! row-major. The loader reads exactly the number of values a buffer needs and
//! fails on the first unreadable file, unparsable token or short file.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use crate::errors::{LoadError, LoadResult};

/// Reads exactly `expected_len` values of type `T` from the file at `path`.
///
/// Values beyond `expected_len` are ignored with a warning.
pub fn load_values<T: FromStr>(path: &Path, expected_len: usize) -> LoadResult<Vec<T>> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let values = parse_values(&contents, expected_len, path)?;
    debug!("Loaded {} values from {}", values.len(), path.display());
    Ok(values)
}

/// Parses exactly `expected_len` values from whitespace-separated text.
///
/// `origin` only labels errors.
pub fn parse_values<T: FromStr>(
    contents: &str,
    expected_len: usize,
    origin: &Path,
) -> LoadResult<Vec<T>> {
    let mut values = Vec::with_capacity(expected_len);
    let mut tokens = contents.split_whitespace();

    for (index, token) in tokens.by_ref().take(expected_len).enumerate() {
        let value = token.parse::<T>().map_err(|_| LoadError::Parse {
            path: origin.to_path_buf(),
            index,
            token: token.to_string(),
        })?;
        values.push(value);
    }

    if values.len() < expected_len {
        return Err(LoadError::TooFewValues {
            path: origin.to_path_buf(),
            expected: expected_len,
            actual: values.len(),
        });
    }

    let extra = tokens.count();
    if extra > 0 {
        warn!(
            "Ignoring {} trailing values in {} after the expected {}",
            extra,
            origin.display(),
            expected_len
        );
    }

    Ok(values)
}
