//! HMM Evaluation Tool
//!
//! Loads a model and one experiment, decodes the hidden states with Viterbi
//! and/or forward-backward and prints per-state prediction estimations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hmmeval_core::{
    load_model, load_observations, Algorithm, EvaluationConfig, EvaluationReport, Evaluator,
};
use tracing::{debug, Level};

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "hmmeval")]
#[command(about = "Score Viterbi and forward-backward state predictions against labelled data")]
#[command(version)]
struct Cli {
    /// Model description file
    model: PathBuf,

    /// Experiment data file
    data: PathBuf,

    /// Decoding algorithm(s) to run
    #[arg(short, long, env = "HMMEVAL_ALGORITHM", value_enum, default_value_t = AlgorithmChoice::Both)]
    algorithm: AlgorithmChoice,

    /// Report format
    #[arg(short, long, env = "HMMEVAL_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also report the begin and end states
    #[arg(long)]
    include_boundary: bool,

    /// Log table sizes and other debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmChoice {
    Viterbi,
    ForwardBackward,
    Both,
}

impl AlgorithmChoice {
    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            Self::Viterbi => vec![Algorithm::Viterbi],
            Self::ForwardBackward => vec![Algorithm::ForwardBackward],
            Self::Both => Algorithm::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> EvaluationConfig {
        EvaluationConfig::new()
            .with_algorithms(self.algorithm.algorithms())
            .with_boundary_states(self.include_boundary)
    }
}

fn run(cli: &Cli) -> Result<EvaluationReport> {
    let model = load_model(&cli.model)
        .with_context(|| format!("Failed to load model from {}", cli.model.display()))?;
    let observations = load_observations(&cli.data, &model)
        .with_context(|| format!("Failed to load experiment data from {}", cli.data.display()))?;
    debug!(
        states = model.num_states(),
        alphabet = model.alphabet_size(),
        steps = observations.len(),
        "loaded experiment"
    );

    Evaluator::new(cli.config())
        .evaluate(&model, &observations)
        .context("Evaluation failed")
}

fn render(report: &EvaluationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let report = run(&cli)?;
    print!("{}", render(&report, cli.format)?);

    Ok(())
}
