//! Lowercase char filter implementation.

use crate::analysis::char_filter::CharFilter;

/// A char filter that lowercases the entire input before tokenization.
///
/// Lowercasing ahead of the tokenizer (rather than as a token filter) means
/// uppercase ASCII letters are folded into the `[a-z]` range the tokenizer
/// matches, instead of being treated as separators.
#[derive(Clone, Debug, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    /// Create a new lowercase char filter.
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter(&self, input: &str) -> String {
        if input.is_ascii() {
            input.to_ascii_lowercase()
        } else {
            input.to_lowercase()
        }
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
