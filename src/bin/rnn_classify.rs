//! Evaluation CLI: classifies the dataset and prints the two accuracy ratios.
//!
//! Usage: `rnn_classify [config.json]`. Without a configuration file the
//! default model and dataset paths and the default shape are used.

use std::env;
use std::process;

use log::{error, info};
use tiled_rnn_inference::errors::EvaluationResult;
use tiled_rnn_inference::{Dataset, EvaluationReport, ModelParameters, RunConfig, run_evaluation};

fn main() {
    env_logger::init();

    match run() {
        Ok(report) => {
            println!("Correctness:");
            println!("  Baseline: {:.6}", report.baseline.ratio());
            println!("  Model:    {:.6}", report.model.ratio());
        }
        Err(e) => {
            error!("Evaluation failed: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> EvaluationResult<EvaluationReport> {
    let args: Vec<String> = env::args().collect();

    let config = match args.len() {
        1 => RunConfig::default(),
        2 => RunConfig::from_file(&args[1])?,
        _ => {
            print_usage();
            process::exit(2);
        }
    };
    config.shape.validate()?;

    let params = ModelParameters::load(&config.model_files(), config.shape)?;
    let dataset = Dataset::load(&config.dataset, &config.shape)?;

    let report = run_evaluation(&params, &dataset, config.threads)?;
    info!("Baseline accuracy: {}", report.baseline);
    info!("Model accuracy:    {}", report.model);

    Ok(report)
}

fn print_usage() {
    println!("Usage:");
    println!("  rnn_classify                  # Default model and dataset paths");
    println!("  rnn_classify <config.json>    # Paths, shape and threads from a JSON file");
}
