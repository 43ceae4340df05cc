//! Symptom analyzer: the tokenizer shared by indexing and querying.
//!
//! # Pipeline
//!
//! 1. LowercaseCharFilter
//! 2. RegexTokenizer (`[a-z0-9]+`, everything else separates tokens)
//! 3. MinLengthFilter (drops tokens of length ≤ 1)
//! 4. StopFilter (English function words and auxiliary verbs)
//!
//! # Examples
//!
//! ```
//! use differential::analysis::analyzer::Analyzer;
//! use differential::analysis::analyzer::symptom::SymptomAnalyzer;
//!
//! let analyzer = SymptomAnalyzer::new().unwrap();
//! let terms = analyzer.terms("I have had a Fever & dry-cough for 2 days").unwrap();
//!
//! assert_eq!(terms, vec!["fever", "dry", "cough", "days"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::min_length::MinLengthFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// The analyzer used for symptom descriptions.
pub struct SymptomAnalyzer {
    inner: PipelineAnalyzer,
}

impl SymptomAnalyzer {
    /// Create a new symptom analyzer with the default stop word list.
    pub fn new() -> Result<Self> {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Create a symptom analyzer with a custom stop filter.
    pub fn with_stop_filter(stop_filter: StopFilter) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_filter(Arc::new(MinLengthFilter::new(2)))
            .add_filter(Arc::new(stop_filter))
            .with_name("symptom");

        Ok(SymptomAnalyzer { inner: analyzer })
    }
}

impl Analyzer for SymptomAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "symptom"
    }
}

impl std::fmt::Debug for SymptomAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymptomAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        SymptomAnalyzer::new().unwrap().terms(text).unwrap()
    }

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            terms("Chest-Pain, SHORTNESS of breath!"),
            vec!["chest", "pain", "shortness", "breath"]
        );
    }

    #[test]
    fn test_drops_short_tokens_and_stop_words() {
        assert_eq!(terms("i am a 7 yr old with x ray"), vec!["yr", "old", "ray"]);
    }

    #[test]
    fn test_keeps_order_and_repetition() {
        assert_eq!(
            terms("cough fever cough"),
            vec!["cough", "fever", "cough"]
        );
    }

    #[test]
    fn test_digits_are_kept() {
        assert_eq!(terms("fever above 101"), vec!["fever", "101"]);
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert!(terms("").is_empty());
        assert!(terms("   ?!... ---").is_empty());
    }

    #[test]
    fn test_contraction_fragments_are_stopped() {
        // "don't" splits into "don" + "t": both are stop words.
        assert_eq!(terms("don't sleep"), vec!["sleep"]);
    }
}
