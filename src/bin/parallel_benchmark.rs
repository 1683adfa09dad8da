//! Throughput of the tiled classifier: plain accumulation reference, tiled
//! kernels on one thread, and tiled kernels spread over all cores.

use std::time::Instant;

use tiled_rnn_inference::activation::argmax;
use tiled_rnn_inference::{
    DenseParameters, ModelParameters, ModelShape, PredictConfig, RecurrentParameters,
    SequenceClassifier,
};

const NUM_SAMPLES: usize = 1024;

fn create_benchmark_model(shape: ModelShape) -> ModelParameters {
    let embedding: Vec<f32> = (0..shape.embedding_len())
        .map(|i| (i as f32 * 0.001).sin() * 0.5)
        .collect();
    let recurrent = RecurrentParameters {
        kernel: (0..shape.rnn_kernel_len())
            .map(|i| (i as f32 * 0.002).cos() * 0.1)
            .collect(),
        recurrent_kernel: (0..shape.rnn_recurrent_kernel_len())
            .map(|i| (i as f32 * 0.003).sin() * 0.1)
            .collect(),
        bias: (0..shape.rnn_state_size)
            .map(|i| (i as f32 * 0.01).sin() * 0.01)
            .collect(),
    };
    let dense = DenseParameters {
        kernel: (0..shape.fc_kernel_len())
            .map(|i| (i as f32 * 0.005).cos() * 0.2)
            .collect(),
        bias: (0..shape.fc_output_size)
            .map(|i| (i as f32 * 0.01).cos() * 0.01)
            .collect(),
    };

    ModelParameters::new(shape, embedding, recurrent, dense).expect("Model creation should succeed")
}

fn generate_sequences(shape: &ModelShape) -> Vec<u32> {
    (0..shape.sequences_len())
        .map(|i| ((i * 7919) % shape.word_num) as u32)
        .collect()
}

/// Row-by-row forward pass with running-sum dot products, no tiling.
fn accumulate_predict(params: &ModelParameters, sequences: &[u32]) -> Vec<u32> {
    let shape = params.shape();
    let recurrent = params.recurrent();
    let dense = params.dense();
    let state_size = shape.rnn_state_size;
    let evaluated = shape.evaluated_samples();

    let mut labels = Vec::with_capacity(evaluated);
    let mut state = vec![0.0f32; state_size];
    let mut next = vec![0.0f32; state_size];

    for sample in 0..evaluated {
        state.fill(0.0);
        for position in 0..shape.sample_len {
            let token = sequences[sample * shape.sample_len + position];
            let input = params
                .embedding_row(token)
                .expect("Benchmark tokens are in the vocabulary");
            for (k, out) in next.iter_mut().enumerate() {
                let mut sum = recurrent.bias[k];
                for (i, &x) in input.iter().enumerate() {
                    sum += x * recurrent.kernel[i * state_size + k];
                }
                for (i, &s) in state.iter().enumerate() {
                    sum += s * recurrent.recurrent_kernel[i * state_size + k];
                }
                *out = sum.tanh();
            }
            std::mem::swap(&mut state, &mut next);
        }

        let logits: Vec<f32> = (0..shape.fc_output_size)
            .map(|j| {
                let mut sum = dense.bias[j];
                for (i, &s) in state.iter().enumerate() {
                    sum += s * dense.kernel[i * shape.fc_output_size + j];
                }
                sum
            })
            .collect();
        labels.push(argmax(&logits) as u32);
    }

    labels
}

fn main() {
    env_logger::init();

    let shape = ModelShape {
        sample_num: NUM_SAMPLES,
        ..ModelShape::default()
    };
    let params = create_benchmark_model(shape);
    let classifier = SequenceClassifier::new(&params).expect("Classifier creation should succeed");
    let sequences = generate_sequences(&shape);

    println!(
        "Model: {} words x {} -> RNN {} -> dense {}",
        shape.word_num, shape.word_size, shape.rnn_state_size, shape.fc_output_size
    );
    println!(
        "Samples: {} x {} tokens, batch {} in tiles of {}",
        shape.sample_num, shape.sample_len, shape.rnn_batch_size, shape.tile_batch
    );
    println!();

    // Warmup
    let _ = classifier.classify_batch(&sequences[..shape.batch_tokens_len()]);

    println!("Running accumulation reference...");
    let start = Instant::now();
    let reference = accumulate_predict(&params, &sequences);
    let reference_duration = start.elapsed();
    println!(
        "Reference:  {:.3?} ({:.1} samples/sec)",
        reference_duration,
        reference.len() as f64 / reference_duration.as_secs_f64()
    );

    println!("\nRunning tiled inference (one thread)...");
    let start = Instant::now();
    let sequential = classifier.predict(&sequences).unwrap();
    let sequential_duration = start.elapsed();
    println!(
        "Sequential: {:.3?} ({:.1} samples/sec)",
        sequential_duration,
        sequential.len() as f64 / sequential_duration.as_secs_f64()
    );

    println!("\nRunning tiled inference (default threads)...");
    let config = PredictConfig::new();
    let threads = config.get_threads();
    let start = Instant::now();
    let parallel = classifier.predict_parallel(&sequences, config).unwrap();
    let parallel_duration = start.elapsed();
    println!(
        "Parallel:   {:.3?} ({:.1} samples/sec, {} threads)",
        parallel_duration,
        parallel.num_samples() as f64 / parallel_duration.as_secs_f64(),
        threads
    );

    let reference_disagreements = reference
        .iter()
        .zip(sequential.iter())
        .filter(|(a, b)| a != b)
        .count();
    println!(
        "\nLabels differing between reference and tiled: {}",
        reference_disagreements
    );
    println!(
        "Sequential and parallel labels identical: {}",
        sequential.as_slice() == parallel.as_slice()
    );

    let speedup = sequential_duration.as_secs_f64() / parallel_duration.as_secs_f64();
    println!("\nSpeedup: {:.3}x", speedup);
}
