//! Precomputed training vectors.

use rayon::prelude::*;

use crate::classifier::vectorizer::{DocumentVector, Vectorizer};
use crate::corpus::TrainingRecord;
use crate::error::Result;

/// One TF-IDF vector per training record, row-aligned with the corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusMatrix {
    rows: Vec<DocumentVector>,
    norms: Vec<f64>,
}

impl CorpusMatrix {
    /// Vectorize every record. Rows are computed in parallel and kept in record order.
    pub fn build(records: &[TrainingRecord], vectorizer: &Vectorizer) -> Result<Self> {
        let rows = records
            .par_iter()
            .map(|record| vectorizer.vectorize_document(&record.text))
            .collect::<Result<Vec<_>>>()?;
        let norms = rows.iter().map(DocumentVector::norm).collect();

        Ok(CorpusMatrix { rows, norms })
    }

    pub fn rows(&self) -> &[DocumentVector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&DocumentVector> {
        self.rows.get(index)
    }

    /// Precomputed norm of a row.
    pub fn norm(&self, index: usize) -> Option<f64> {
        self.norms.get(index).copied()
    }

    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with no vocabulary terms.
    pub fn zero_rows(&self) -> usize {
        self.norms.iter().filter(|n| **n == 0.0).count()
    }
}
