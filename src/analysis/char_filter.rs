//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw text string before it is passed to the
//! tokenizer, which matters when the tokenizer's pattern assumes a normalized
//! alphabet (the symptom tokenizer only recognises `[a-z0-9]`).
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseCharFilter`] - Unicode-aware lowercasing of the whole input
//!
//! # Examples
//!
//! ```
//! use differential::analysis::char_filter::CharFilter;
//! use differential::analysis::char_filter::lowercase::LowercaseCharFilter;
//!
//! let filter = LowercaseCharFilter::new();
//! assert_eq!(filter.filter("Chest PAIN"), "chest pain");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text, returning the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;
