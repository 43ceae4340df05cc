//! TF-IDF + cosine similarity classification.
//!
//! The classifier is split into independent stages composed by explicit data
//! passing:
//!
//! ```text
//! CorpusStore ─▶ VocabularyIndexer ─▶ (Vocabulary, IdfTable)
//!                                          │
//!                     Vectorizer ◀─────────┘
//!                      │      │
//!     records ─────────┘      └──── query (+ QueryContext)
//!        ▼                              ▼
//!   CorpusMatrix ─────────────▶ Ranker ─▶ Vec<RankedPrediction>
//! ```
//!
//! Everything built here is immutable once constructed; see
//! [`crate::engine`] for how the pieces are bundled into a snapshot and
//! swapped atomically on reload.

pub mod matrix;
pub mod ranker;
pub mod similarity;
pub mod vectorizer;
pub mod vocabulary;

pub use matrix::CorpusMatrix;
pub use ranker::{LabelScore, RankedPrediction, Ranker};
pub use similarity::{cosine_similarity, softmax_with_temperature};
pub use vectorizer::{DocumentVector, QueryContext, Vectorizer};
pub use vocabulary::{DocumentFrequencyThreshold, IdfTable, Vocabulary, VocabularyIndexer};
