//! Analyzer implementations that combine char filters, tokenizers and token filters.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod pipeline;
pub mod symptom;

pub use analyzer::Analyzer;
pub use pipeline::PipelineAnalyzer;
pub use symptom::SymptomAnalyzer;
