//! Command line argument parsing for the differential CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::classifier::DocumentFrequencyThreshold;
use crate::engine::ClassifierConfig;
use crate::error::Result;
use crate::evaluation::EvaluationConfig;

/// differential - ranked differential diagnosis from free-text symptoms
#[derive(Parser, Debug, Clone)]
#[command(name = "differential")]
#[command(about = "Rank likely conditions for a free-text symptom description")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DifferentialArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Corpus bundle (JSON)
    #[arg(long, value_name = "CORPUS_FILE", env = "DIFFERENTIAL_CORPUS", required = true)]
    pub corpus: PathBuf,

    /// Classifier configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "DIFFERENTIAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum number of records a term must appear in
    #[arg(long, value_name = "N")]
    pub min_df: Option<usize>,

    /// Number of top similarities averaged per label
    #[arg(long, value_name = "N")]
    pub per_label_window: Option<usize>,

    /// Softmax temperature for confidences
    #[arg(long, value_name = "T")]
    pub temperature: Option<f64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DifferentialArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }

    /// The classifier config: the `--config` file (or defaults) with flag overrides applied.
    pub fn classifier_config(&self) -> Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => ClassifierConfig::load(path)?,
            None => ClassifierConfig::default(),
        };

        if let Some(min_df) = self.min_df {
            config.min_document_frequency = DocumentFrequencyThreshold::Fixed(min_df);
        }
        if let Some(window) = self.per_label_window {
            config.per_label_window = window;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rank conditions for a symptom description
    Predict(PredictArgs),

    /// List the conditions the corpus covers, by category
    Diseases,

    /// Show corpus and vocabulary statistics
    Stats,

    /// Evaluate on a held-out stratified split
    Evaluate(EvaluateArgs),
}

/// Arguments for a prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Symptom description
    #[arg(value_name = "SYMPTOMS")]
    pub symptoms: String,

    /// Number of conditions to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Patient age in years
    #[arg(long)]
    pub age: Option<i64>,

    /// Patient sex
    #[arg(long)]
    pub sex: Option<String>,

    /// Medical history entries (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub history: Vec<String>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Share of each condition's records held out for testing
    #[arg(long, default_value = "0.2")]
    pub test_ratio: f64,

    /// Random seed for the split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Cutoff for NDCG@k
    #[arg(short, long, default_value = "5")]
    pub k: usize,
}

impl EvaluateArgs {
    pub fn evaluation_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            test_ratio: self.test_ratio,
            seed: self.seed,
            k: self.k,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
