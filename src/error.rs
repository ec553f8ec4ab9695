//! Error types for the vocabulary lookup library.
//!
//! All fallible operations return [`VocabError`]. Only construction can fail:
//! once a [`VocabularyLookup`](crate::lookup::engine::VocabularyLookup) exists,
//! lookups report "not found" and "ambiguous" as `None`, never as an error.
//!
//! # Examples
//!
//! ```
//! use vocab_lookup::error::{VocabError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(VocabError::invalid_config("no snapshot source selected"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for vocabulary lookup operations.
#[derive(Error, Debug)]
pub enum VocabError {
    /// I/O errors (reading an export file, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON syntax or shape errors in an export document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The export document was empty or whitespace only
    #[error("Empty input: the export document contains no data")]
    EmptyInput,

    /// Structural failure in an export document
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Unknown or malformed language code
    #[error("Language error: {0}")]
    Language(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure while resolving or downloading a remote export
    #[error("Remote error: {0}")]
    Remote(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with VocabError.
pub type Result<T> = std::result::Result<T, VocabError>;

impl VocabError {
    /// Create a new snapshot error.
    pub fn snapshot<S: Into<String>>(msg: S) -> Self {
        VocabError::Snapshot(msg.into())
    }

    /// Create a new language error.
    pub fn language<S: Into<String>>(msg: S) -> Self {
        VocabError::Language(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        VocabError::InvalidConfig(msg.into())
    }

    /// Create a new remote error.
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        VocabError::Remote(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        VocabError::Other(msg.into())
    }
}
