//! Error types for the differential library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`DifferentialError`] enum. Conditions the classifier treats as normal input
//! (empty query text, out-of-vocabulary terms, missing label metadata, an engine
//! that has not finished loading) are not represented here.
//!
//! # Examples
//!
//! ```
//! use differential::error::{DifferentialError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(DifferentialError::invalid_config("temperature must be finite"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for differential operations.
#[derive(Error, Debug)]
pub enum DifferentialError {
    /// I/O errors (reading corpus or configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenizer construction, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Malformed corpus input
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// The training corpus holds no records, so IDF is undefined
    #[error("Corpus error: cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// Invalid classifier configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A prediction request that fails validation
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with DifferentialError.
pub type Result<T> = std::result::Result<T, DifferentialError>;

impl DifferentialError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        DifferentialError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        DifferentialError::Corpus(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        DifferentialError::InvalidConfig(msg.into())
    }

    /// Create a new invalid query error.
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        DifferentialError::InvalidQuery(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DifferentialError::Other(msg.into())
    }
}
