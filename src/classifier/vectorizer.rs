//! Text → TF-IDF vector conversion.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::classifier::vocabulary::{IdfTable, Vocabulary};
use crate::error::Result;

/// Patient context appended to a query before tokenization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_sex<S: Into<String>>(mut self, sex: S) -> Self {
        self.sex = Some(sex.into());
        self
    }

    pub fn with_history<I, S>(mut self, history: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.history = history.into_iter().map(Into::into).collect();
        self
    }

    /// Check if no context field is set.
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.sex.is_none() && self.history.is_empty()
    }

    /// Descriptive words for an age band.
    pub fn age_band(age: i64) -> &'static str {
        match age {
            a if a < 18 => "pediatric child",
            a if a < 40 => "young adult",
            a if a < 65 => "middle aged",
            _ => "elderly senior",
        }
    }

    /// Append the context words to `text`, separated by single spaces.
    pub fn enrich(&self, text: &str) -> String {
        let mut enriched = String::from(text);
        if let Some(age) = self.age {
            enriched.push(' ');
            enriched.push_str(Self::age_band(age));
        }
        if let Some(sex) = &self.sex {
            enriched.push(' ');
            enriched.push_str(sex);
        }
        if !self.history.is_empty() {
            enriched.push(' ');
            enriched.push_str(&self.history.join(" "));
        }
        enriched
    }
}

/// A dense vector of vocabulary-length weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    values: Vec<f64>,
}

impl DocumentVector {
    /// An all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        DocumentVector {
            values: vec![0.0; dimension],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Check if every component is zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Indices of non-zero components.
    pub fn non_zero_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, _)| i)
    }
}

/// Converts text into augmented-TF × IDF vectors over a fixed vocabulary.
#[derive(Clone)]
pub struct Vectorizer {
    analyzer: Arc<dyn Analyzer>,
    vocabulary: Arc<Vocabulary>,
    idf: Arc<IdfTable>,
}

impl Vectorizer {
    pub fn new(analyzer: Arc<dyn Analyzer>, vocabulary: Arc<Vocabulary>, idf: Arc<IdfTable>) -> Self {
        Vectorizer {
            analyzer,
            vocabulary,
            idf,
        }
    }

    /// Vector dimension (vocabulary size).
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Vectorize a query, enriching it with `context` first if given.
    ///
    /// Each in-vocabulary term `t` gets `(0.5 + 0.5 * tf(t) / max_tf) * idf(t)`,
    /// where `max_tf` is the highest raw count of any term in the text,
    /// out-of-vocabulary terms included. Text without vocabulary terms yields
    /// the zero vector.
    pub fn vectorize(&self, text: &str, context: Option<&QueryContext>) -> Result<DocumentVector> {
        let terms = match context {
            Some(context) => self.analyzer.terms(&context.enrich(text))?,
            None => self.analyzer.terms(text)?,
        };

        let mut term_frequency: AHashMap<String, usize> = AHashMap::new();
        for term in terms {
            *term_frequency.entry(term).or_insert(0) += 1;
        }

        let mut vector = DocumentVector::zeros(self.dimension());
        let max_tf = term_frequency.values().copied().max().unwrap_or(0).max(1) as f64;

        for (term, count) in &term_frequency {
            if let Some(index) = self.vocabulary.get(term) {
                let idf = self.idf.get(index).unwrap_or(1.0);
                vector.values[index] = (0.5 + 0.5 * (*count as f64) / max_tf) * idf;
            }
        }

        Ok(vector)
    }

    /// Vectorize a training document (never enriched).
    pub fn vectorize_document(&self, text: &str) -> Result<DocumentVector> {
        self.vectorize(text, None)
    }
}

impl std::fmt::Debug for Vectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vectorizer")
            .field("analyzer", &self.analyzer.name())
            .field("dimension", &self.dimension())
            .finish()
    }
}
