//! Core analyzer trait definition.
//!
//! Analyzers are the complete text processing pipeline used by both sides of
//! the classifier: the vocabulary indexer analyzes every training record and
//! the vectorizer analyzes every query with the *same* analyzer instance.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Vocabulary / Vectorizer
//!             ↓
//!         Char Filters
//!             ↓
//!         Tokenizer
//!             ↓
//!         Token Filters
//! ```
//!
//! # Examples
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use differential::analysis::analyzer::Analyzer;
//! use differential::analysis::token::TokenStream;
//! use differential::error::Result;
//!
//! struct MyAnalyzer;
//!
//! impl Analyzer for MyAnalyzer {
//!     fn analyze(&self, text: &str) -> Result<TokenStream> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "my_analyzer"
//!     }
//! }
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Analysis must be deterministic and pure: the same text always yields the
/// same token sequence, in input order, without deduplication.
///
/// The trait requires `Send + Sync` so a single analyzer can be shared between
/// an engine snapshot and concurrent queries.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Analyze the given text and collect the token texts.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}
