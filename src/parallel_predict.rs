use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use log::debug;

use crate::classifier::{BatchWorkspace, SequenceClassifier};
use crate::errors::{ParallelPredictError, ParallelPredictResult};

#[derive(Debug, Clone, Default)]
pub struct PredictConfig {
    threads: Option<usize>,
}

impl PredictConfig {
    pub fn new() -> Self {
        Self { threads: None }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn get_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

pub struct ParallelPredictOutput {
    labels: Vec<u32>,
    batch_count: usize,
    batch_size: usize,
}

impl ParallelPredictOutput {
    fn new(labels: Vec<u32>, batch_count: usize, batch_size: usize) -> Self {
        Self {
            labels,
            batch_count,
            batch_size,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    /// Labels of batch `index`, or `None` past the last batch.
    pub fn get_batch(&self, index: usize) -> Option<&[u32]> {
        if index >= self.batch_count {
            return None;
        }
        let start = index * self.batch_size;
        Some(&self.labels[start..start + self.batch_size])
    }

    pub fn into_labels(self) -> Vec<u32> {
        self.labels
    }
}

/// Classifies every full batch of `sequences` on a pool of scoped worker threads.
///
/// Workers pull batch indexes from a shared counter and each owns one
/// [`BatchWorkspace`]; parameters are only borrowed. Labels are reassembled in
/// batch order, so the result equals sequential prediction exactly.
pub fn execute_parallel_predict(
    classifier: &SequenceClassifier<'_>,
    sequences: &[u32],
    config: &PredictConfig,
) -> ParallelPredictResult<ParallelPredictOutput> {
    let shape = *classifier.shape();

    if sequences.len() != shape.sequences_len() {
        return Err(ParallelPredictError::SequenceBufferSizeMismatch {
            expected: shape.sequences_len(),
            actual: sequences.len(),
        });
    }

    let num_threads = config.get_threads();
    if num_threads == 0 {
        return Err(ParallelPredictError::InvalidThreadCount { count: 0 });
    }

    let batch_count = classifier
        .checked_batch_count()
        .map_err(|source| ParallelPredictError::PredictionFailed {
            batch_index: 0,
            source,
        })?;
    let batch_tokens = shape.batch_tokens_len();
    let batch_size = shape.rnn_batch_size;
    let num_threads = num_threads.min(batch_count);
    debug!(
        "Predicting {} batches on {} threads",
        batch_count, num_threads
    );

    let batch_counter = AtomicUsize::new(0);

    let mut batch_results: Vec<Option<Vec<u32>>> = vec![None; batch_count];

    thread::scope(|scope| {
        let batch_counter_ref = &batch_counter;

        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                scope.spawn(move || -> ParallelPredictResult<Vec<(usize, Vec<u32>)>> {
                    let mut workspace = BatchWorkspace::new(&shape);
                    let mut finished = Vec::new();

                    loop {
                        let batch_index = batch_counter_ref.fetch_add(1, Ordering::Relaxed);
                        if batch_index >= batch_count {
                            break;
                        }

                        let start = batch_index * batch_tokens;
                        classifier
                            .classify_batch_with_workspace(
                                &sequences[start..start + batch_tokens],
                                &mut workspace,
                            )
                            .map_err(|source| ParallelPredictError::PredictionFailed {
                                batch_index,
                                source,
                            })?;

                        finished.push((batch_index, workspace.labels().to_vec()));
                    }

                    Ok(finished)
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(result) => {
                    for (batch_index, labels) in result? {
                        batch_results[batch_index] = Some(labels);
                    }
                }
                Err(_) => return Err(ParallelPredictError::ThreadPanicked),
            }
        }

        Ok(())
    })?;

    let mut labels = Vec::with_capacity(batch_count * batch_size);
    for (batch_index, batch) in batch_results.into_iter().enumerate() {
        let batch = batch.ok_or(ParallelPredictError::MissingBatch { batch_index })?;
        labels.extend(batch);
    }

    Ok(ParallelPredictOutput::new(labels, batch_count, batch_size))
}
