//! Classification and ranking quality metrics.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The true label of one test record and the labels ranked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub truth: String,
    /// Ranked labels, best first.
    pub ranked: Vec<String>,
}

impl Outcome {
    pub fn new<S: Into<String>>(truth: S, ranked: Vec<String>) -> Self {
        Outcome {
            truth: truth.into(),
            ranked,
        }
    }

    /// The top-ranked label.
    pub fn predicted(&self) -> Option<&str> {
        self.ranked.first().map(String::as_str)
    }

    pub fn is_correct(&self) -> bool {
        self.predicted() == Some(self.truth.as_str())
    }
}

/// Support-weighted precision, recall and F1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Fraction of outcomes whose top-ranked label is the true one.
pub fn accuracy(outcomes: &[Outcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|o| o.is_correct()).count() as f64 / outcomes.len() as f64
}

/// Per-label precision, recall and F1 over top-1 predictions, averaged with
/// each label weighted by its number of true instances. Undefined ratios
/// count as 0.
pub fn weighted_scores(outcomes: &[Outcome]) -> WeightedScores {
    if outcomes.is_empty() {
        return WeightedScores::default();
    }

    let mut support: AHashMap<&str, usize> = AHashMap::new();
    let mut predicted: AHashMap<&str, usize> = AHashMap::new();
    let mut true_positives: AHashMap<&str, usize> = AHashMap::new();

    for outcome in outcomes {
        *support.entry(outcome.truth.as_str()).or_insert(0) += 1;
        if let Some(label) = outcome.predicted() {
            *predicted.entry(label).or_insert(0) += 1;
        }
        if outcome.is_correct() {
            *true_positives.entry(outcome.truth.as_str()).or_insert(0) += 1;
        }
    }

    let mut scores = WeightedScores::default();
    for (label, &count) in &support {
        let tp = true_positives.get(label).copied().unwrap_or(0) as f64;
        let precision = ratio(tp, predicted.get(label).copied().unwrap_or(0) as f64);
        let recall = ratio(tp, count as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);

        let weight = count as f64;
        scores.precision += weight * precision;
        scores.recall += weight * recall;
        scores.f1 += weight * f1;
    }

    let total = outcomes.len() as f64;
    scores.precision /= total;
    scores.recall /= total;
    scores.f1 /= total;
    scores
}

/// NDCG@k of a single ranking with one relevant label.
pub fn sample_ndcg(ranked: &[String], truth: &str, k: usize) -> f64 {
    ranked
        .iter()
        .take(k)
        .position(|label| label == truth)
        .map(|rank| 1.0 / (rank as f64 + 2.0).log2())
        .unwrap_or(0.0)
}

/// Mean NDCG@k over all outcomes.
pub fn ndcg_at_k(outcomes: &[Outcome], k: usize) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes
        .iter()
        .map(|o| sample_ndcg(&o.ranked, &o.truth, k))
        .sum::<f64>()
        / outcomes.len() as f64
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
