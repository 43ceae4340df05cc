//! Minimum length filter implementation.
//!
//! # Examples
//!
//! ```
//! use differential::analysis::token_filter::Filter;
//! use differential::analysis::token_filter::min_length::MinLengthFilter;
//! use differential::analysis::token::Token;
//!
//! let filter = MinLengthFilter::new(2);
//! let tokens = vec![Token::new("a", 0), Token::new("ache", 1), Token::new("", 2)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "ache");
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that removes tokens shorter than `min_length` characters.
///
/// Empty tokens are always removed.
#[derive(Clone, Debug)]
pub struct MinLengthFilter {
    min_length: usize,
}

impl MinLengthFilter {
    /// Create a new filter keeping tokens of at least `min_length` characters.
    pub fn new(min_length: usize) -> Self {
        MinLengthFilter {
            min_length: min_length.max(1),
        }
    }

    /// Get the minimum token length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Default for MinLengthFilter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Filter for MinLengthFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let min_length = self.min_length;
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| token.len() >= min_length)
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "min_length"
    }
}
