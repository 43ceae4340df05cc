//! Classifier configuration.
//!
//! # Examples
//!
//! ```
//! use differential::engine::config::ClassifierConfig;
//! use differential::classifier::DocumentFrequencyThreshold;
//!
//! let config = ClassifierConfig::default();
//! assert_eq!(config.per_label_window, 3);
//! assert_eq!(config.temperature, 5.0);
//!
//! let mut lenient = ClassifierConfig::default();
//! lenient.min_document_frequency = DocumentFrequencyThreshold::Fixed(1);
//! assert!(lenient.validate().is_ok());
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::{DocumentFrequencyThreshold, Ranker};
use crate::error::{DifferentialError, Result};

/// Hyperparameters for building and querying a [`crate::engine::SymptomEngine`].
///
/// Every field has a default, so a JSON config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Vocabulary admission threshold.
    pub min_document_frequency: DocumentFrequencyThreshold,
    /// Number of top similarities averaged per label (≥ 1).
    pub per_label_window: usize,
    /// Softmax temperature (finite, ≥ 0).
    pub temperature: f64,
    /// Number of predictions returned when a request does not say.
    pub default_top_k: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            min_document_frequency: DocumentFrequencyThreshold::default(),
            per_label_window: Ranker::DEFAULT_PER_LABEL_WINDOW,
            temperature: Ranker::DEFAULT_TEMPERATURE,
            default_top_k: 5,
        }
    }
}

impl ClassifierConfig {
    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        self.min_document_frequency.validate()?;

        if self.per_label_window == 0 {
            return Err(DifferentialError::invalid_config(
                "per_label_window must be at least 1",
            ));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(DifferentialError::invalid_config(format!(
                "temperature must be a finite non-negative number, got {}",
                self.temperature
            )));
        }

        Ok(())
    }

    /// Parse and validate a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ClassifierConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The ranker these parameters describe.
    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.per_label_window, self.temperature)
    }
}
