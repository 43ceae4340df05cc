//! Command implementations for the differential CLI.

use std::path::Path;

use anyhow::Context;

use crate::api::{self, MedicalHistory, PredictRequest};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::CorpusStore;
use crate::engine::{ClassifierConfig, SymptomEngine};
use crate::error::Result;
use crate::evaluation::Evaluator;

/// Execute a CLI command.
pub fn execute_command(args: DifferentialArgs) -> Result<()> {
    let config = args.classifier_config()?;
    let corpus = load_corpus(&args.corpus)?;

    match &args.command {
        Command::Predict(predict_args) => predict(predict_args, corpus, config, &args),
        Command::Diseases => list_diseases(corpus, config, &args),
        Command::Stats => show_stats(corpus, config, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, corpus, config, &args),
    }
}

fn load_corpus(path: &Path) -> Result<CorpusStore> {
    let corpus = CorpusStore::load(path)
        .with_context(|| format!("failed to load corpus from {}", path.display()))?;
    Ok(corpus)
}

fn build_engine(corpus: CorpusStore, config: ClassifierConfig) -> Result<SymptomEngine> {
    let engine = SymptomEngine::from_corpus(corpus, config)
        .context("failed to build the classifier")?;
    Ok(engine)
}

/// Rank conditions for a symptom description.
fn predict(
    args: &PredictArgs,
    corpus: CorpusStore,
    config: ClassifierConfig,
    cli_args: &DifferentialArgs,
) -> Result<()> {
    let engine = build_engine(corpus, config)?;

    let request = PredictRequest {
        symptoms: args.symptoms.clone(),
        age: args.age,
        sex: args.sex.clone(),
        medical_history: (!args.history.is_empty())
            .then(|| MedicalHistory::List(args.history.clone())),
        top_k: args.top_k,
    };
    let response = api::predict(&engine, &request)?;

    output_result("Differential diagnosis", &response, cli_args)
}

/// List the conditions in the corpus.
fn list_diseases(
    corpus: CorpusStore,
    config: ClassifierConfig,
    cli_args: &DifferentialArgs,
) -> Result<()> {
    let engine = build_engine(corpus, config)?;
    output_result("Conditions", &api::diseases(&engine), cli_args)
}

/// Show snapshot statistics.
fn show_stats(
    corpus: CorpusStore,
    config: ClassifierConfig,
    cli_args: &DifferentialArgs,
) -> Result<()> {
    let engine = build_engine(corpus, config)?;
    let stats = engine
        .snapshot()
        .map(|snapshot| snapshot.stats())
        .context("no snapshot loaded")?;

    output_result("Corpus statistics", &stats, cli_args)
}

/// Evaluate on a held-out split.
fn evaluate(
    args: &EvaluateArgs,
    corpus: CorpusStore,
    config: ClassifierConfig,
    cli_args: &DifferentialArgs,
) -> Result<()> {
    let evaluator = Evaluator::new(config, args.evaluation_config())?;
    let report = evaluator.evaluate(&corpus)?;

    output_result("Held-out evaluation", &report, cli_args)
}
