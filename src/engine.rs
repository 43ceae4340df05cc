//! The symptom engine: a reloadable handle over an immutable snapshot.
//!
//! Readers clone an `Arc<EngineSnapshot>` under a short read lock and work on
//! it without holding the lock. [`SymptomEngine::load`] builds a complete new
//! snapshot before taking the write lock, so a query sees either the old
//! corpus or the new one, never a mixture. A failed build leaves the current
//! snapshot in place.
//!
//! Each `load` takes a generation number before it starts building. When
//! several loads overlap, a build that finishes after a later-started one has
//! already been installed is discarded, so the most recently started load wins.

pub mod config;
pub mod snapshot;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::analysis::analyzer::{Analyzer, SymptomAnalyzer};
use crate::classifier::{QueryContext, RankedPrediction};
use crate::corpus::CorpusStore;
use crate::error::Result;

pub use config::ClassifierConfig;
pub use snapshot::{EngineSnapshot, SnapshotStats};

/// The installed snapshot and the generation of the load that built it.
#[derive(Default)]
struct Current {
    generation: u64,
    snapshot: Option<Arc<EngineSnapshot>>,
}

/// Thread-safe classifier handle.
pub struct SymptomEngine {
    config: ClassifierConfig,
    analyzer: Arc<dyn Analyzer>,
    generations: AtomicU64,
    current: RwLock<Current>,
}

impl SymptomEngine {
    /// Create an engine with no corpus loaded, using the symptom analyzer.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        Self::with_analyzer(config, Arc::new(SymptomAnalyzer::new()?))
    }

    /// Create an engine with a custom analyzer.
    pub fn with_analyzer(config: ClassifierConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        config.validate()?;
        Ok(SymptomEngine {
            config,
            analyzer,
            generations: AtomicU64::new(0),
            current: RwLock::new(Current::default()),
        })
    }

    /// Create an engine and load `corpus` into it.
    pub fn from_corpus(corpus: CorpusStore, config: ClassifierConfig) -> Result<Self> {
        let engine = Self::new(config)?;
        engine.load(corpus)?;
        Ok(engine)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Build a snapshot for `corpus` and make it current.
    ///
    /// Returns the snapshot that is current afterwards. That is the newly
    /// built one unless a later-started load has already been installed.
    pub fn load(&self, corpus: CorpusStore) -> Result<Arc<EngineSnapshot>> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(EngineSnapshot::build(
            corpus,
            self.analyzer.clone(),
            &self.config,
        )?);

        Ok(self.install(generation, snapshot))
    }

    fn install(&self, generation: u64, snapshot: Arc<EngineSnapshot>) -> Arc<EngineSnapshot> {
        let stats = snapshot.stats();
        let mut current = self.current.write();
        if generation < current.generation {
            if let Some(newer) = current.snapshot.clone() {
                log::debug!(
                    "discarded snapshot from load {generation}; load {} is already current",
                    current.generation
                );
                return newer;
            }
        }

        let previous = current.snapshot.replace(snapshot.clone());
        current.generation = generation;
        drop(current);

        log::info!(
            "{} snapshot: {} records, {} labels, {} terms in {}ms",
            if previous.is_some() { "swapped" } else { "built" },
            stats.records,
            stats.labels,
            stats.vocabulary_size,
            stats.build_time_ms
        );
        if stats.zero_vectors > 0 {
            log::debug!(
                "{} training records have no vocabulary terms",
                stats.zero_vectors
            );
        }

        snapshot
    }

    /// Check if a snapshot is loaded.
    pub fn is_ready(&self) -> bool {
        self.current.read().snapshot.is_some()
    }

    /// The current snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<EngineSnapshot>> {
        self.current.read().snapshot.clone()
    }

    /// Rank labels for `text`.
    ///
    /// Returns an empty list while no snapshot is loaded.
    pub fn predict(
        &self,
        text: &str,
        top_k: usize,
        context: Option<&QueryContext>,
    ) -> Result<Vec<RankedPrediction>> {
        match self.snapshot() {
            Some(snapshot) => snapshot.predict(text, top_k, context),
            None => {
                log::debug!("predict called before a corpus was loaded");
                Ok(Vec::new())
            }
        }
    }

    /// Rank labels for `text` with the configured default `top_k` and no context.
    pub fn predict_default(&self, text: &str) -> Result<Vec<RankedPrediction>> {
        self.predict(text, self.config.default_top_k, None)
    }
}

impl std::fmt::Debug for SymptomEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymptomEngine")
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .field("ready", &self.is_ready())
            .finish()
    }
}
