//! Held-out evaluation of the classifier.
//!
//! An [`Evaluator`] splits a corpus per label, builds a snapshot from the
//! training side only and scores every test record against it.

pub mod metrics;
pub mod split;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, SymptomAnalyzer};
use crate::corpus::CorpusStore;
use crate::engine::{ClassifierConfig, EngineSnapshot};
use crate::error::{DifferentialError, Result};

use self::metrics::Outcome;
use self::split::stratified_split;

/// Split and ranking parameters for an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Share of each label's records held out for testing, in `[0, 1)`.
    pub test_ratio: f64,
    pub seed: u64,
    /// Cutoff for NDCG@k.
    pub k: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            test_ratio: 0.2,
            seed: 42,
            k: 5,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.test_ratio.is_finite() || !(0.0..1.0).contains(&self.test_ratio) {
            return Err(DifferentialError::invalid_config(format!(
                "test_ratio must be within [0, 1), got {}",
                self.test_ratio
            )));
        }
        if self.k == 0 {
            return Err(DifferentialError::invalid_config("k must be at least 1"));
        }
        Ok(())
    }
}

/// Accuracy on the test records of one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryAccuracy {
    pub accuracy: f64,
    pub samples: usize,
}

/// Category → accuracy, keyed by the category of each test record's true label.
pub type BiasReport = BTreeMap<String, CategoryAccuracy>;

/// Result of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub m1_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub ndcg: f64,
    pub k: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub bias_report: BiasReport,
}

/// Runs held-out evaluations.
pub struct Evaluator {
    classifier_config: ClassifierConfig,
    config: EvaluationConfig,
    analyzer: Arc<dyn Analyzer>,
}

impl Evaluator {
    pub fn new(classifier_config: ClassifierConfig, config: EvaluationConfig) -> Result<Self> {
        classifier_config.validate()?;
        config.validate()?;
        Ok(Evaluator {
            classifier_config,
            config,
            analyzer: Arc::new(SymptomAnalyzer::new()?),
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate on a stratified split of `corpus`.
    pub fn evaluate(&self, corpus: &CorpusStore) -> Result<EvaluationReport> {
        let start = Instant::now();
        let split = stratified_split(corpus.records(), self.config.test_ratio, self.config.seed)?;
        if split.test.is_empty() {
            return Err(DifferentialError::corpus(
                "test split is empty; labels need at least two records to be held out",
            ));
        }

        let snapshot = EngineSnapshot::build(
            corpus.subset(&split.train),
            self.analyzer.clone(),
            &self.classifier_config,
        )?;

        let records = corpus.records();
        let k = self.config.k;
        let outcomes = split
            .test
            .par_iter()
            .filter_map(|&index| records.get(index))
            .map(|record| -> Result<Outcome> {
                let ranked = snapshot
                    .predict(&record.text, k, None)?
                    .into_iter()
                    .map(|prediction| prediction.label)
                    .collect();
                Ok(Outcome::new(record.label.clone(), ranked))
            })
            .collect::<Result<Vec<_>>>()?;

        let scores = metrics::weighted_scores(&outcomes);
        let report = EvaluationReport {
            m1_accuracy: metrics::accuracy(&outcomes),
            precision: scores.precision,
            recall: scores.recall,
            f1_score: scores.f1,
            ndcg: metrics::ndcg_at_k(&outcomes, k),
            k,
            train_size: split.train.len(),
            test_size: outcomes.len(),
            bias_report: bias_report(&outcomes, corpus),
        };

        log::info!(
            "evaluated {} test records against {} training records in {}ms: accuracy {:.4}, ndcg@{} {:.4}",
            report.test_size,
            report.train_size,
            start.elapsed().as_millis(),
            report.m1_accuracy,
            k,
            report.ndcg
        );

        Ok(report)
    }
}

/// Per-category accuracy of `outcomes`.
pub fn bias_report(outcomes: &[Outcome], corpus: &CorpusStore) -> BiasReport {
    let mut tallies: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for outcome in outcomes {
        let category = corpus.metadata_or_default(&outcome.truth).category;
        let (correct, total) = tallies.entry(category).or_insert((0, 0));
        *total += 1;
        if outcome.is_correct() {
            *correct += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(category, (correct, total))| {
            let accuracy = if total > 0 {
                correct as f64 / total as f64
            } else {
                0.0
            };
            (
                category,
                CategoryAccuracy {
                    accuracy,
                    samples: total,
                },
            )
        })
        .collect()
}
