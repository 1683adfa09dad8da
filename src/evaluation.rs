//! Accuracy bookkeeping.
//!
//! Scoring is a separate step from inference: it takes the predicted labels and
//! the two reference label sets and produces two independent accuracy metrics,
//! one for the baseline labels and one for the model's own predictions, both
//! measured against the ground truth.

use std::fmt;

use log::debug;

use crate::errors::{InferenceError, InferenceResult};

/// Running count of matching labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy {
    pub matches: usize,
    pub total: usize,
}

impl Accuracy {
    pub fn record(&mut self, matched: bool) {
        self.total += 1;
        if matched {
            self.matches += 1;
        }
    }

    /// `matches / total`, or 0 when nothing was scored.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.matches as f64 / self.total as f64
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ({}/{})", self.ratio(), self.matches, self.total)
    }
}

/// Accuracy of the baseline labels and of the model predictions against the ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    pub baseline: Accuracy,
    pub model: Accuracy,
}

/// Scores `predictions` and the matching prefix of `baseline` against `actual`.
///
/// Only the first `predictions.len()` samples are scored, so samples of a
/// trailing partial batch never count. Reference sets shorter than the
/// predictions are rejected.
pub fn evaluate(
    predictions: &[u32],
    baseline: &[u32],
    actual: &[u32],
) -> InferenceResult<EvaluationReport> {
    let scored = predictions.len();
    for (reference, labels) in [("baseline", baseline), ("actual", actual)] {
        if labels.len() < scored {
            return Err(InferenceError::ReferenceLengthMismatch {
                reference,
                expected: scored,
                actual: labels.len(),
            });
        }
    }

    let mut report = EvaluationReport::default();
    for (sample, ((&predicted, &base), &truth)) in predictions
        .iter()
        .zip(baseline.iter())
        .zip(actual.iter())
        .enumerate()
    {
        report.baseline.record(base == truth);
        report.model.record(predicted == truth);

        if predicted != base {
            debug!(
                "Sample {}: predicted {}, baseline {}, actual {}",
                sample, predicted, base, truth
            );
        }
    }

    Ok(report)
}
