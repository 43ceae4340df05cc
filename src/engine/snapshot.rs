//! Immutable classifier state built from one corpus.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::analysis::analyzer::Analyzer;
use crate::classifier::{
    CorpusMatrix, QueryContext, RankedPrediction, Ranker, Vectorizer, Vocabulary,
    VocabularyIndexer,
};
use crate::corpus::CorpusStore;
use crate::engine::config::ClassifierConfig;
use crate::error::{DifferentialError, Result};

/// Summary of a built snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotStats {
    pub records: usize,
    pub labels: usize,
    pub vocabulary_size: usize,
    /// Records whose text contains no vocabulary term.
    pub zero_vectors: usize,
    pub build_time_ms: u128,
}

/// Corpus, vocabulary, IDF weights and corpus matrix for a single corpus
/// version. Never mutated after [`EngineSnapshot::build`].
#[derive(Debug)]
pub struct EngineSnapshot {
    corpus: CorpusStore,
    vectorizer: Vectorizer,
    matrix: CorpusMatrix,
    ranker: Ranker,
    build_time: Duration,
}

impl EngineSnapshot {
    /// Build every derived structure for `corpus`.
    pub fn build(
        corpus: CorpusStore,
        analyzer: Arc<dyn Analyzer>,
        config: &ClassifierConfig,
    ) -> Result<Self> {
        if corpus.is_empty() {
            return Err(DifferentialError::EmptyCorpus);
        }

        let start = Instant::now();
        let (vocabulary, idf) = VocabularyIndexer::new(analyzer.clone())
            .with_min_document_frequency(config.min_document_frequency)
            .build(corpus.records())?;
        let vectorizer = Vectorizer::new(analyzer, Arc::new(vocabulary), Arc::new(idf));
        let matrix = CorpusMatrix::build(corpus.records(), &vectorizer)?;

        Ok(EngineSnapshot {
            corpus,
            vectorizer,
            matrix,
            ranker: config.ranker(),
            build_time: start.elapsed(),
        })
    }

    /// Rank labels for `text`, optionally enriched with `context`.
    pub fn predict(
        &self,
        text: &str,
        top_k: usize,
        context: Option<&QueryContext>,
    ) -> Result<Vec<RankedPrediction>> {
        let query = self.vectorizer.vectorize(text, context)?;
        Ok(self.ranker.rank(&query, &self.matrix, &self.corpus, top_k))
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vectorizer.vocabulary()
    }

    pub fn matrix(&self) -> &CorpusMatrix {
        &self.matrix
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn build_time(&self) -> Duration {
        self.build_time
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            records: self.corpus.len(),
            labels: self.corpus.labels().len(),
            vocabulary_size: self.vocabulary().len(),
            zero_vectors: self.matrix.zero_rows(),
            build_time_ms: self.build_time.as_millis(),
        }
    }
}
