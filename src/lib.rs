//! Inference library for a small recurrent sequence classifier.
//!
//! Token sequences go through an embedding lookup, a single-layer simple RNN
//! with tanh, a dense projection, softmax and argmax. The recurrent update and
//! the dense projection run as tiled streaming kernels that reduce every dot
//! product with an explicit binary reduction tree, carrying unpaired elements
//! forward when a round has odd width.

pub mod activation;
pub mod buffers;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod kernels;
pub mod loader;
pub mod model_parameters;
pub mod parallel_predict;
pub mod reduction;
pub mod shape;

pub use activation::Activation;
pub use classifier::{BatchOutput, BatchWorkspace, SequenceClassifier, run_evaluation};
pub use config::{DatasetFiles, ModelFiles, RunConfig};
pub use dataset::Dataset;
pub use evaluation::{Accuracy, EvaluationReport, evaluate};
pub use model_parameters::{DenseParameters, ModelParameters, RecurrentParameters};
pub use parallel_predict::{ParallelPredictOutput, PredictConfig};
pub use shape::ModelShape;
