//! # Differential
//!
//! Ranked differential diagnosis from free-text symptom descriptions, using
//! TF-IDF vectors and cosine similarity over a labeled corpus of clinical
//! vignettes.
//!
//! ## Features
//!
//! - Pure Rust, fully offline
//! - Symptom analysis pipeline (lowercasing, regex tokenization, stop words)
//! - Smoothed IDF with configurable vocabulary admission
//! - Optional patient context (age band, sex, history) folded into queries
//! - Per-label top-k similarity aggregation with temperature softmax
//! - Immutable snapshots with atomic corpus reload
//! - Held-out evaluation (accuracy, weighted F1, NDCG@k, per-category bias)
//!
//! ## Example
//!
//! ```
//! use differential::corpus::{CorpusStore, TrainingRecord};
//! use differential::engine::{ClassifierConfig, SymptomEngine};
//!
//! let corpus = CorpusStore::from_records(vec![
//!     TrainingRecord::new("crushing chest pain radiating to left arm", "Myocardial Infarction"),
//!     TrainingRecord::new("chest pain with sweating and left arm numbness", "Myocardial Infarction"),
//!     TrainingRecord::new("wheezing and shortness of breath", "Asthma"),
//!     TrainingRecord::new("wheezing with chest tightness", "Asthma"),
//! ]);
//! let engine = SymptomEngine::from_corpus(corpus, ClassifierConfig::default()).unwrap();
//!
//! let predictions = engine.predict("sudden chest pain in my left arm", 5, None).unwrap();
//! assert_eq!(predictions[0].label, "Myocardial Infarction");
//! ```

pub mod analysis;
pub mod api;
pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod evaluation;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, SymptomAnalyzer};
    pub use crate::api::{DiseaseCatalog, PredictRequest, PredictResponse};
    pub use crate::classifier::{QueryContext, RankedPrediction};
    pub use crate::corpus::{CorpusStore, LabelMetadata, TrainingRecord};
    pub use crate::engine::{ClassifierConfig, EngineSnapshot, SymptomEngine};
    pub use crate::error::{DifferentialError, Result};
    pub use crate::evaluation::{EvaluationConfig, EvaluationReport, Evaluator};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
