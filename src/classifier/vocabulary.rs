//! Vocabulary construction and inverse document frequency weighting.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::corpus::TrainingRecord;
use crate::error::{DifferentialError, Result};

/// Minimum number of documents a term must appear in to enter the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFrequencyThreshold {
    /// A fixed document count.
    Fixed(usize),
    /// `max(min, ceil(ratio * N))` for a corpus of `N` records.
    Scaled { ratio: f64, min: usize },
}

impl DocumentFrequencyThreshold {
    /// Resolve the threshold for a corpus of `n_documents` records. Never below 1.
    pub fn threshold(&self, n_documents: usize) -> usize {
        match *self {
            DocumentFrequencyThreshold::Fixed(count) => count.max(1),
            DocumentFrequencyThreshold::Scaled { ratio, min } => {
                let scaled = (ratio * n_documents as f64).ceil();
                let scaled = if scaled.is_finite() && scaled > 0.0 {
                    scaled as usize
                } else {
                    0
                };
                scaled.max(min).max(1)
            }
        }
    }

    /// Check the threshold parameters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            DocumentFrequencyThreshold::Fixed(_) => Ok(()),
            DocumentFrequencyThreshold::Scaled { ratio, .. } => {
                if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
                    Ok(())
                } else {
                    Err(DifferentialError::invalid_config(format!(
                        "document frequency ratio must be within [0, 1], got {ratio}"
                    )))
                }
            }
        }
    }
}

impl Default for DocumentFrequencyThreshold {
    fn default() -> Self {
        DocumentFrequencyThreshold::Fixed(2)
    }
}

/// Term → dimension index mapping, indices assigned in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from terms in index order. Duplicates keep their first index.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Vocabulary::default();
        for term in terms {
            let term = term.into();
            if let Entry::Vacant(entry) = vocabulary.index.entry(term) {
                vocabulary.terms.push(entry.key().clone());
                entry.insert(vocabulary.terms.len() - 1);
            }
        }
        vocabulary
    }

    /// Dimension index of a term.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Term at a dimension index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Smoothed IDF weights, index-aligned with a [`Vocabulary`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    weights: Vec<f64>,
    document_frequencies: Vec<usize>,
    n_documents: usize,
}

impl IdfTable {
    /// `ln((N + 1) / (df + 1)) + 1`, strictly positive whenever `df <= N`.
    pub fn smoothed(n_documents: usize, document_frequency: usize) -> f64 {
        ((n_documents as f64 + 1.0) / (document_frequency as f64 + 1.0)).ln() + 1.0
    }

    /// Weight for a dimension index.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Weight for a term, looked up through its vocabulary.
    pub fn weight(&self, vocabulary: &Vocabulary, term: &str) -> Option<f64> {
        vocabulary.get(term).and_then(|index| self.get(index))
    }

    /// Document frequency recorded for a dimension index.
    pub fn document_frequency(&self, index: usize) -> Option<usize> {
        self.document_frequencies.get(index).copied()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of documents the table was computed over.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Builds the vocabulary and IDF table from training records.
#[derive(Clone)]
pub struct VocabularyIndexer {
    analyzer: Arc<dyn Analyzer>,
    min_document_frequency: DocumentFrequencyThreshold,
}

impl VocabularyIndexer {
    /// Create an indexer with the default admission threshold (df ≥ 2).
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        VocabularyIndexer {
            analyzer,
            min_document_frequency: DocumentFrequencyThreshold::default(),
        }
    }

    /// Set the vocabulary admission threshold.
    pub fn with_min_document_frequency(mut self, threshold: DocumentFrequencyThreshold) -> Self {
        self.min_document_frequency = threshold;
        self
    }

    /// Build the vocabulary and IDF table.
    ///
    /// Document frequency counts a term once per record. Only terms reaching
    /// the admission threshold get a dimension; indices follow the order in
    /// which terms were first seen while scanning the corpus.
    pub fn build(&self, records: &[TrainingRecord]) -> Result<(Vocabulary, IdfTable)> {
        if records.is_empty() {
            return Err(DifferentialError::EmptyCorpus);
        }

        let n_documents = records.len();
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();
        let mut discovery_order: Vec<String> = Vec::new();

        for record in records {
            let mut seen = AHashSet::new();
            for term in self.analyzer.terms(&record.text)? {
                if !seen.insert(term.clone()) {
                    continue;
                }
                match document_frequency.entry(term) {
                    Entry::Occupied(mut entry) => *entry.get_mut() += 1,
                    Entry::Vacant(entry) => {
                        discovery_order.push(entry.key().clone());
                        entry.insert(1);
                    }
                }
            }
        }

        let threshold = self.min_document_frequency.threshold(n_documents);
        let admitted: Vec<(String, usize)> = discovery_order
            .into_iter()
            .filter_map(|term| {
                let df = document_frequency.get(&term).copied().unwrap_or(0);
                (df >= threshold).then_some((term, df))
            })
            .collect();

        let idf = IdfTable {
            weights: admitted
                .iter()
                .map(|(_, df)| IdfTable::smoothed(n_documents, *df))
                .collect(),
            document_frequencies: admitted.iter().map(|(_, df)| *df).collect(),
            n_documents,
        };
        let vocabulary = Vocabulary::from_terms(admitted.into_iter().map(|(term, _)| term));

        log::debug!(
            "indexed {} records: {} distinct terms, {} admitted (df >= {})",
            n_documents,
            document_frequency.len(),
            vocabulary.len(),
            threshold
        );

        Ok((vocabulary, idf))
    }
}

impl std::fmt::Debug for VocabularyIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VocabularyIndexer")
            .field("analyzer", &self.analyzer.name())
            .field("min_document_frequency", &self.min_document_frequency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::SymptomAnalyzer;

    fn indexer() -> VocabularyIndexer {
        VocabularyIndexer::new(Arc::new(SymptomAnalyzer::new().unwrap()))
    }

    fn records(texts: &[&str]) -> Vec<TrainingRecord> {
        texts
            .iter()
            .map(|text| TrainingRecord::new(*text, "label"))
            .collect()
    }

    #[test]
    fn test_admits_only_terms_in_two_documents() {
        let records = records(&[
            "fever cough headache",
            "fever chills",
            "rash itching",
            "itching swelling cough",
        ]);
        let (vocabulary, idf) = indexer().build(&records).unwrap();

        assert_eq!(vocabulary.terms(), &["fever", "cough", "itching"]);
        assert_eq!(idf.len(), vocabulary.len());
        assert!(!vocabulary.contains("headache"));
        assert!(!vocabulary.contains("rash"));
    }

    #[test]
    fn test_repetition_within_a_document_counts_once() {
        let records = records(&["cough cough cough", "fever"]);
        let (vocabulary, _) = indexer().build(&records).unwrap();
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_idf_formula() {
        let records = records(&["fever cough", "fever chills", "fever rash", "cough"]);
        let (vocabulary, idf) = indexer().build(&records).unwrap();

        let fever = idf.weight(&vocabulary, "fever").unwrap();
        let cough = idf.weight(&vocabulary, "cough").unwrap();
        assert!((fever - ((5.0f64 / 4.0).ln() + 1.0)).abs() < 1e-12);
        assert!((cough - ((5.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!(cough > fever);
        assert_eq!(idf.document_frequency(vocabulary.get("fever").unwrap()), Some(3));
        assert_eq!(idf.n_documents(), 4);
    }

    #[test]
    fn test_idf_positive_when_term_in_every_document() {
        let records = records(&["fever", "fever", "fever"]);
        let (vocabulary, idf) = indexer().build(&records).unwrap();
        let weight = idf.weight(&vocabulary, "fever").unwrap();
        assert!((weight - 1.0).abs() < 1e-12);
        assert!(weight > 0.0);
    }

    #[test]
    fn test_single_document_corpus() {
        let records = records(&["fever cough"]);
        let (vocabulary, idf) = indexer().build(&records).unwrap();
        assert!(vocabulary.is_empty());
        assert!(idf.is_empty());

        let (vocabulary, idf) = indexer()
            .with_min_document_frequency(DocumentFrequencyThreshold::Fixed(1))
            .build(&records)
            .unwrap();
        assert_eq!(vocabulary.len(), 2);
        assert!(idf.weights().iter().all(|w| *w > 0.0));
    }

    #[test]
    fn test_empty_corpus_fails() {
        let result = indexer().build(&[]);
        assert!(matches!(result, Err(DifferentialError::EmptyCorpus)));
    }

    #[test]
    fn test_scaled_threshold() {
        let scaled = DocumentFrequencyThreshold::Scaled { ratio: 0.01, min: 2 };
        assert_eq!(scaled.threshold(10), 2);
        assert_eq!(scaled.threshold(1000), 10);
        assert_eq!(scaled.threshold(1001), 11);
        assert_eq!(DocumentFrequencyThreshold::Fixed(0).threshold(5), 1);

        assert!(scaled.validate().is_ok());
        assert!(
            DocumentFrequencyThreshold::Scaled { ratio: 1.5, min: 1 }
                .validate()
                .is_err()
        );
        assert!(
            DocumentFrequencyThreshold::Scaled { ratio: f64::NAN, min: 1 }
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_threshold_serde_shape() {
        let fixed: DocumentFrequencyThreshold = serde_json::from_str(r#"{"fixed": 3}"#).unwrap();
        assert_eq!(fixed, DocumentFrequencyThreshold::Fixed(3));

        let scaled: DocumentFrequencyThreshold =
            serde_json::from_str(r#"{"scaled": {"ratio": 0.05, "min": 2}}"#).unwrap();
        assert_eq!(
            scaled,
            DocumentFrequencyThreshold::Scaled { ratio: 0.05, min: 2 }
        );
    }

    #[test]
    fn test_vocabulary_from_terms_dedupes() {
        let vocabulary = Vocabulary::from_terms(vec!["b", "a", "b"]);
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.get("b"), Some(0));
        assert_eq!(vocabulary.get("a"), Some(1));
        assert_eq!(vocabulary.term(1), Some("a"));
        assert_eq!(vocabulary.term(2), None);
    }
}
