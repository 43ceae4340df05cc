//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step after char filtering: they split the input
//! text into tokens that token filters then refine.
//!
//! # Available Tokenizers
//!
//! - [`regex::RegexTokenizer`] - Extracts tokens matching a regular expression
//!
//! # Examples
//!
//! ```
//! use differential::analysis::tokenizer::Tokenizer;
//! use differential::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("sore-throat, fever").unwrap().collect();
//! assert_eq!(tokens.len(), 3);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so one tokenizer can be shared by every
/// query served from an engine snapshot.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;
