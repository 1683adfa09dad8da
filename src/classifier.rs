//! Inference driver for the embedding → RNN → dense → softmax classifier.
//!
//! One batch of `rnn_batch_size` sequences runs through a fixed sequence of
//! stages:
//!
//! ```text
//! INIT (state = 0)
//!   -> sample_len x [ GATHER_EMBEDDINGS -> RECUR_UPDATE -> ACTIVATE (tanh) -> SWAP ]
//!   -> PROJECT (dense) -> CLASSIFY (softmax + argmax)
//! ```
//!
//! Batches are independent of each other; time steps inside a batch are not.

use log::{debug, info, trace, warn};

use crate::activation::{Activation, argmax_rows};
use crate::buffers::StatePair;
use crate::errors::{EvaluationResult, InferenceError, InferenceResult, ParallelPredictResult};
use crate::kernels::{DenseKernel, RecurrentKernel};
use crate::dataset::Dataset;
use crate::evaluation::{EvaluationReport, evaluate};
use crate::model_parameters::{ModelParameters, check_len};
use crate::parallel_predict::{ParallelPredictOutput, PredictConfig, execute_parallel_predict};
use crate::shape::ModelShape;

/// Per-batch scratch space of the driver.
///
/// One workspace is reused across every batch a worker processes; nothing in it
/// carries meaning from one batch to the next.
#[derive(Debug, Clone)]
pub struct BatchWorkspace {
    input_state: Vec<f32>,
    states: StatePair,
    logits: Vec<f32>,
    probabilities: Vec<f32>,
    labels: Vec<u32>,
}

impl BatchWorkspace {
    pub fn new(shape: &ModelShape) -> Self {
        Self {
            input_state: vec![0.0f32; shape.input_state_len()],
            states: StatePair::new(shape.state_len()),
            logits: vec![0.0f32; shape.fc_output_len()],
            probabilities: vec![0.0f32; shape.sm_batch_size * shape.sm_class_size],
            labels: vec![0u32; shape.sm_batch_size],
        }
    }

    /// Final recurrent state of the last processed batch.
    pub fn state(&self) -> &[f32] {
        self.states.current()
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Copies the classification results out of the workspace.
    pub fn to_output(&self) -> BatchOutput {
        BatchOutput {
            logits: self.logits.clone(),
            probabilities: self.probabilities.clone(),
            labels: self.labels.clone(),
        }
    }
}

/// Classification results of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutput {
    /// `fc_batch_size × fc_output_size` dense projection outputs.
    pub logits: Vec<f32>,
    /// `sm_batch_size × sm_class_size` softmax distribution.
    pub probabilities: Vec<f32>,
    /// Predicted label per sample.
    pub labels: Vec<u32>,
}

/// Runs the classifier over batches of token sequences.
///
/// The classifier only borrows the parameters, so one instance can be shared
/// by any number of worker threads.
pub struct SequenceClassifier<'a> {
    params: &'a ModelParameters,
    recurrent_kernel: RecurrentKernel<'a>,
    dense_kernel: DenseKernel<'a>,
    recurrent_activation: Activation,
}

impl<'a> SequenceClassifier<'a> {
    pub fn new(params: &'a ModelParameters) -> InferenceResult<Self> {
        let shape = params.shape();
        Ok(Self {
            params,
            recurrent_kernel: RecurrentKernel::new(shape, params.recurrent())?,
            dense_kernel: DenseKernel::new(shape, params.dense())?,
            recurrent_activation: Activation::Tanh,
        })
    }

    pub fn shape(&self) -> &ModelShape {
        self.params.shape()
    }

    /// Copies the embedding of every row's token at `position` into `input_state`.
    ///
    /// `tokens` holds one batch, `rnn_batch_size` rows of `sample_len` tokens.
    pub fn gather_embeddings(
        &self,
        tokens: &[u32],
        position: usize,
        input_state: &mut [f32],
    ) -> InferenceResult<()> {
        let shape = self.shape();
        for (row, input_row) in input_state
            .chunks_exact_mut(shape.rnn_input_size)
            .enumerate()
        {
            let token = tokens[row * shape.sample_len + position];
            let embedding =
                self.params
                    .embedding_row(token)
                    .ok_or(InferenceError::TokenOutOfRange {
                        token,
                        sample: row,
                        position,
                        word_num: shape.word_num,
                    })?;
            input_row.copy_from_slice(embedding);
        }
        Ok(())
    }

    /// Runs the time-step loop for one batch, leaving the final state in the
    /// workspace.
    pub fn encode_batch_with_workspace(
        &self,
        tokens: &[u32],
        workspace: &mut BatchWorkspace,
    ) -> InferenceResult<()> {
        let shape = self.shape();
        check_len("batch_tokens", shape.batch_tokens_len(), tokens.len())?;

        let BatchWorkspace {
            input_state,
            states,
            ..
        } = workspace;

        states.reset();
        for position in 0..shape.sample_len {
            self.gather_embeddings(tokens, position, input_state)?;

            let (last_state, output_state) = states.split();
            self.recurrent_kernel
                .apply(last_state, input_state, output_state)?;
            self.recurrent_activation.apply_in_place(output_state);

            states.swap();
        }
        trace!("Final recurrent state: {:?}", states.current());

        Ok(())
    }

    /// Final recurrent state (`rnn_batch_size × rnn_state_size`) of one batch.
    pub fn encode_batch(&self, tokens: &[u32]) -> InferenceResult<Vec<f32>> {
        let mut workspace = BatchWorkspace::new(self.shape());
        self.encode_batch_with_workspace(tokens, &mut workspace)?;
        Ok(workspace.state().to_vec())
    }

    /// Classifies one batch, reusing the buffers of `workspace`.
    pub fn classify_batch_with_workspace(
        &self,
        tokens: &[u32],
        workspace: &mut BatchWorkspace,
    ) -> InferenceResult<()> {
        self.encode_batch_with_workspace(tokens, workspace)?;

        let shape = self.shape();
        self.dense_kernel
            .apply(workspace.states.current(), &mut workspace.logits)?;

        workspace.probabilities.copy_from_slice(&workspace.logits);
        Activation::Softmax.apply_rows(&mut workspace.probabilities, shape.sm_class_size);
        argmax_rows(
            &workspace.logits,
            shape.sm_class_size,
            &mut workspace.labels,
        );

        Ok(())
    }

    /// Classifies one batch of `rnn_batch_size` sequences.
    pub fn classify_batch(&self, tokens: &[u32]) -> InferenceResult<BatchOutput> {
        let mut workspace = BatchWorkspace::new(self.shape());
        self.classify_batch_with_workspace(tokens, &mut workspace)?;
        Ok(workspace.to_output())
    }

    /// Predicts a label for every sample of every full batch of the dataset.
    ///
    /// `sequences` holds `sample_num × sample_len` tokens. A trailing partial
    /// batch is not classified.
    pub fn predict(&self, sequences: &[u32]) -> InferenceResult<Vec<u32>> {
        let shape = self.shape();
        check_len("sequences", shape.sequences_len(), sequences.len())?;
        let batch_count = self.checked_batch_count()?;

        let batch_tokens = shape.batch_tokens_len();
        let mut workspace = BatchWorkspace::new(shape);
        let mut labels = Vec::with_capacity(shape.evaluated_samples());

        for batch_index in 0..batch_count {
            let start = batch_index * batch_tokens;
            self.classify_batch_with_workspace(
                &sequences[start..start + batch_tokens],
                &mut workspace,
            )?;
            labels.extend_from_slice(workspace.labels());
            debug!("Classified batch {}/{}", batch_index + 1, batch_count);
        }

        Ok(labels)
    }

    /// Same as [`predict`](Self::predict), with whole batches spread over worker threads.
    pub fn predict_parallel(
        &self,
        sequences: &[u32],
        config: PredictConfig,
    ) -> ParallelPredictResult<ParallelPredictOutput> {
        execute_parallel_predict(self, sequences, &config)
    }

    /// Number of full batches, failing when the dataset cannot fill a single one.
    pub fn checked_batch_count(&self) -> InferenceResult<usize> {
        let shape = self.shape();
        let batch_count = shape.batch_count();
        if batch_count == 0 {
            return Err(InferenceError::EmptyDataset {
                sample_num: shape.sample_num,
                batch_size: shape.fc_batch_size,
            });
        }
        let skipped = shape.sample_num - shape.evaluated_samples();
        if skipped > 0 {
            warn!(
                "{} trailing samples do not fill a batch of {} and are not classified",
                skipped, shape.fc_batch_size
            );
        }
        Ok(batch_count)
    }
}

/// Classifies the whole dataset and scores it against both label sets.
///
/// With `threads` set, batches are distributed over that many workers;
/// otherwise they run one after another on the calling thread.
pub fn run_evaluation(
    params: &ModelParameters,
    dataset: &Dataset,
    threads: Option<usize>,
) -> EvaluationResult<EvaluationReport> {
    let classifier = SequenceClassifier::new(params)?;

    let predictions = match threads {
        Some(threads) => classifier
            .predict_parallel(&dataset.sequences, PredictConfig::new().with_threads(threads))?
            .into_labels(),
        None => classifier.predict(&dataset.sequences)?,
    };
    info!("Classified {} samples", predictions.len());

    Ok(evaluate(
        &predictions,
        &dataset.baseline_labels,
        &dataset.actual_labels,
    )?)
}
