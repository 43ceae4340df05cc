//! Text analysis module.
//!
//! This module provides tokenization and filtering. A single
//! [`SymptomAnalyzer`](analyzer::SymptomAnalyzer) is shared by vocabulary
//! construction and query vectorization so both sides see identical tokens.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
