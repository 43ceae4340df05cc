//! Per-label aggregation and confidence normalization.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::matrix::CorpusMatrix;
use crate::classifier::similarity::{cosine_with_norms, softmax_with_temperature};
use crate::classifier::vectorizer::DocumentVector;
use crate::corpus::{CorpusStore, TrainingRecord};

/// A ranked label with its confidence and descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    #[serde(rename = "disease")]
    pub label: String,
    /// Softmax probability over the returned predictions.
    pub confidence: f64,
    pub category: String,
    pub description: String,
    pub severity: String,
    #[serde(rename = "seek_care")]
    pub care_advice: String,
}

/// Aggregated similarity of a query to one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Turns a query vector into an ordered list of label predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranker {
    per_label_window: usize,
    temperature: f64,
}

impl Ranker {
    pub const DEFAULT_PER_LABEL_WINDOW: usize = 3;
    pub const DEFAULT_TEMPERATURE: f64 = 5.0;

    /// Create a ranker. The window is clamped to at least 1.
    pub fn new(per_label_window: usize, temperature: f64) -> Self {
        Ranker {
            per_label_window: per_label_window.max(1),
            temperature,
        }
    }

    pub fn per_label_window(&self) -> usize {
        self.per_label_window
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Cosine similarity of `query` to every matrix row, in row order.
    pub fn similarities(&self, query: &DocumentVector, matrix: &CorpusMatrix) -> Vec<f64> {
        let query_norm = query.norm();
        matrix
            .rows()
            .par_iter()
            .zip(matrix.norms().par_iter())
            .map(|(row, row_norm)| {
                cosine_with_norms(query.as_slice(), query_norm, row.as_slice(), *row_norm)
            })
            .collect()
    }

    /// Average of each label's top similarities, highest score first.
    ///
    /// Labels with equal scores keep the order in which they first appear in
    /// `records`.
    pub fn label_scores(&self, similarities: &[f64], records: &[TrainingRecord]) -> Vec<LabelScore> {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: AHashMap<&str, Vec<f64>> = AHashMap::new();

        for (record, similarity) in records.iter().zip(similarities.iter()) {
            grouped
                .entry(record.label.as_str())
                .or_insert_with(|| {
                    order.push(record.label.as_str());
                    Vec::new()
                })
                .push(*similarity);
        }

        let mut scores: Vec<LabelScore> = order
            .into_iter()
            .filter_map(|label| {
                let mut values = grouped.remove(label)?;
                values.sort_by(|a, b| b.total_cmp(a));
                values.truncate(self.per_label_window);
                let score = values.iter().sum::<f64>() / values.len() as f64;
                Some(LabelScore {
                    label: label.to_string(),
                    score,
                })
            })
            .collect();

        // stable: ties keep first-appearance order
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores
    }

    /// Rank the labels of `corpus` for `query`, returning at most `top_k` predictions.
    pub fn rank(
        &self,
        query: &DocumentVector,
        matrix: &CorpusMatrix,
        corpus: &CorpusStore,
        top_k: usize,
    ) -> Vec<RankedPrediction> {
        let similarities = self.similarities(query, matrix);
        let mut scores = self.label_scores(&similarities, corpus.records());
        scores.truncate(top_k);

        let raw: Vec<f64> = scores.iter().map(|s| s.score).collect();
        let confidences = softmax_with_temperature(&raw, self.temperature);

        scores
            .into_iter()
            .zip(confidences)
            .map(|(score, confidence)| {
                let metadata = corpus.metadata_or_default(&score.label);
                RankedPrediction {
                    label: score.label,
                    confidence,
                    category: metadata.category,
                    description: metadata.description,
                    severity: metadata.severity,
                    care_advice: metadata.care_advice,
                }
            })
            .collect()
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Ranker::new(Self::DEFAULT_PER_LABEL_WINDOW, Self::DEFAULT_TEMPERATURE)
    }
}
