//! Activation and output functions for the classifier.
//!
//! This module provides the recurrent unit's tanh, the classifier head's
//! softmax and the argmax that turns a row of scores into a label. Softmax is
//! implemented with numerical stability in mind.

use serde::{Deserialize, Serialize};

/// Represents the type of activation function to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Activation {
    /// Hyperbolic tangent activation function: f(x) = tanh(x).
    Tanh,
    /// Softmax activation function:
    ///
    /// Applies the numerically stable Softmax function across a vector to produce a probability distribution:
    /// ```text
    /// Softmax(x_i) = exp(x_i - max(x)) / sum_j exp(x_j - max(x))
    /// ```
    ///
    /// This implementation mirrors Keras and TensorFlow's approach to ensure numerical stability by preventing
    /// potential overflow or underflow during exponentiation.
    Softmax,
}

impl Activation {
    /// Apply the activation function to a single value.
    ///
    /// Softmax over a one-element row is always 1.
    pub fn apply_single(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Softmax => 1.0,
        }
    }

    /// Apply the activation function to a slice of values in place.
    pub fn apply_in_place(self, values: &mut [f32]) {
        match self {
            Activation::Softmax => {
                let max_val = values.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
                let mut sum = 0.0f32;

                for val in values.iter_mut() {
                    *val = (*val - max_val).exp();
                    sum += *val;
                }

                for val in values.iter_mut() {
                    *val /= sum;
                }
            }
            Activation::Tanh => {
                for val in values.iter_mut() {
                    *val = val.tanh();
                }
            }
        }
    }

    /// Apply the activation function independently to each row of `row_width` values.
    ///
    /// Only softmax depends on the row boundaries; elementwise activations give
    /// the same result as [`apply_in_place`](Self::apply_in_place).
    pub fn apply_rows(self, values: &mut [f32], row_width: usize) {
        if row_width == 0 {
            return;
        }
        for row in values.chunks_exact_mut(row_width) {
            self.apply_in_place(row);
        }
    }
}

/// Index of the largest value; ties resolve to the first occurrence.
///
/// An empty row yields 0.
pub fn argmax(row: &[f32]) -> usize {
    let mut best_index = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (index, &value) in row.iter().enumerate() {
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    best_index
}

/// Writes the argmax of every `row_width`-wide row of `values` into `labels`.
pub fn argmax_rows(values: &[f32], row_width: usize, labels: &mut [u32]) {
    for (label, row) in labels.iter_mut().zip(values.chunks_exact(row_width)) {
        *label = argmax(row) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: f32 = 0.00005;

    #[test]
    fn test_softmax() {
        let mut values = [1.0, 2.0, 3.0];
        Activation::Softmax.apply_in_place(&mut values);

        // Expected outputs: [0.09003057, 0.24472847, 0.66524096]
        assert!((values[0] - 0.09003057).abs() < DELTA);
        assert!((values[1] - 0.24472847).abs() < DELTA);
        assert!((values[2] - 0.66524096).abs() < DELTA);
    }

    #[test]
    fn test_softmax_extreme_values_stay_finite() {
        let mut values = [1000.0, 999.0, -1000.0];
        Activation::Softmax.apply_in_place(&mut values);
        assert!(values.iter().all(|v| v.is_finite()));
        assert!((values.iter().sum::<f32>() - 1.0).abs() < DELTA);
    }

    #[test]
    fn test_softmax_rows_are_independent() {
        let mut values = [0.0, 0.0, 1.0, 2.0];
        Activation::Softmax.apply_rows(&mut values, 2);
        assert!((values[0] - 0.5).abs() < DELTA);
        assert!((values[1] - 0.5).abs() < DELTA);
        assert!((values[2] - 0.26894142).abs() < DELTA);
        assert!((values[3] - 0.7310586).abs() < DELTA);
    }

    #[test]
    fn test_tanh() {
        assert!((Activation::Tanh.apply_single(0.0) - 0.0).abs() < DELTA);
        assert!((Activation::Tanh.apply_single(1.0) - 1.0_f32.tanh()).abs() < DELTA);
        assert!((Activation::Tanh.apply_single(-1.0) - (-1.0_f32).tanh()).abs() < DELTA);

        let mut values = [0.5, -2.0];
        Activation::Tanh.apply_rows(&mut values, 1);
        assert!((values[0] - 0.5_f32.tanh()).abs() < DELTA);
        assert!((values[1] - (-2.0_f32).tanh()).abs() < DELTA);
    }

    #[test]
    fn test_softmax_of_single_value_is_one() {
        assert_eq!(Activation::Softmax.apply_single(-3.5), 1.0);

        let mut values = [42.0];
        Activation::Softmax.apply_in_place(&mut values);
        assert_eq!(values, [Activation::Softmax.apply_single(42.0)]);

        let mut rows = [7.0, -7.0];
        Activation::Softmax.apply_rows(&mut rows, 1);
        assert_eq!(rows, [1.0, 1.0]);
    }

    #[test]
    fn test_argmax_first_occurrence_wins() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[-1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_argmax_rows() {
        let values = [0.0, 1.0, 2.0, 2.0, 5.0, -5.0];
        let mut labels = [9u32; 3];
        argmax_rows(&values, 2, &mut labels);
        assert_eq!(labels, [1, 0, 0]);
    }

    #[test]
    fn test_deserialize_by_name() {
        let activation: Activation = serde_json::from_str("\"TANH\"").unwrap();
        assert_eq!(activation, Activation::Tanh);
        assert!(serde_json::from_str::<Activation>("\"RELU\"").is_err());
    }
}
