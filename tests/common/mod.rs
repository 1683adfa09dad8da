//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use tiled_rnn_inference::{DenseParameters, ModelParameters, ModelShape, RecurrentParameters};

pub const DELTA: f32 = 1e-5;

/// Deterministic pseudo-random parameters for `shape`.
pub fn create_test_model(shape: ModelShape) -> ModelParameters {
    let embedding: Vec<f32> = (0..shape.embedding_len())
        .map(|i| (i as f32 * 0.013).sin() * 0.8)
        .collect();
    let recurrent = RecurrentParameters {
        kernel: (0..shape.rnn_kernel_len())
            .map(|i| (i as f32 * 0.021).cos() * 0.15)
            .collect(),
        recurrent_kernel: (0..shape.rnn_recurrent_kernel_len())
            .map(|i| (i as f32 * 0.017).sin() * 0.1)
            .collect(),
        bias: (0..shape.rnn_state_size)
            .map(|i| (i as f32 * 0.3).sin() * 0.05)
            .collect(),
    };
    let dense = DenseParameters {
        kernel: (0..shape.fc_kernel_len())
            .map(|i| (i as f32 * 0.029).cos() * 0.3)
            .collect(),
        bias: (0..shape.fc_output_size)
            .map(|i| (i as f32 * 0.5).cos() * 0.02)
            .collect(),
    };
    ModelParameters::new(shape, embedding, recurrent, dense).expect("Model creation should succeed")
}

/// Deterministic token sequences covering the whole vocabulary.
pub fn generate_sequences(shape: &ModelShape) -> Vec<u32> {
    (0..shape.sequences_len())
        .map(|i| ((i * 7919 + 13) % shape.word_num) as u32)
        .collect()
}

pub fn generate_values(len: usize, scale: f32) -> Vec<f32> {
    (0..len).map(|i| (i as f32 * 0.01).sin() * scale).collect()
}

/// Plain row-major `[rows][inner] · [inner][cols]` product, accumulated left to right in f64.
pub fn reference_matmul(a: &[f32], b: &[f32], rows: usize, inner: usize, cols: usize) -> Vec<f64> {
    let mut out = vec![0.0f64; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            let mut sum = 0.0f64;
            for i in 0..inner {
                sum += a[r * inner + i] as f64 * b[i * cols + c] as f64;
            }
            out[r * cols + c] = sum;
        }
    }
    out
}

/// One recurrent step computed without tiles or reduction trees (tanh applied).
pub fn reference_step(params: &ModelParameters, state: &[f32], input: &[f32]) -> Vec<f32> {
    let shape = params.shape();
    let recurrent = params.recurrent();
    let rows = shape.rnn_batch_size;
    let from_input = reference_matmul(
        input,
        &recurrent.kernel,
        rows,
        shape.rnn_input_size,
        shape.rnn_state_size,
    );
    let from_state = reference_matmul(
        state,
        &recurrent.recurrent_kernel,
        rows,
        shape.rnn_state_size,
        shape.rnn_state_size,
    );
    (0..rows * shape.rnn_state_size)
        .map(|i| {
            let k = i % shape.rnn_state_size;
            ((from_input[i] + from_state[i] + recurrent.bias[k] as f64) as f32).tanh()
        })
        .collect()
}
