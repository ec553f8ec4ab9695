//! Lookup engine configuration.
//!
//! # Examples
//!
//! ```
//! use vocab_lookup::analysis::prefilter::PrefilterKind;
//! use vocab_lookup::lookup::config::LookupConfig;
//!
//! let config: LookupConfig = serde_json::from_str(r#"{
//!     "prefilters": ["remove-parenthesis-suffix", "remove-numeric-prefix"],
//!     "fallback_language": "en"
//! }"#).unwrap();
//!
//! assert_eq!(config.prefilters.len(), 2);
//! assert_eq!(config.prefilters[0], PrefilterKind::RemoveParenthesisSuffix);
//! assert_eq!(config.download_timeout_secs, 30);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::prefilter::PrefilterKind;
use crate::error::{Result, VocabError};
use crate::vocabulary::language::Language;

/// Serializable configuration of a lookup engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Predefined prefilters, applied left to right.
    pub prefilters: Vec<PrefilterKind>,

    /// Language tried when the context language does not settle an ambiguity.
    pub fallback_language: Language,

    /// Timeout for each HTTP request made while downloading an export.
    pub download_timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            prefilters: Vec::new(),
            fallback_language: Language::English,
            download_timeout_secs: 30,
        }
    }
}

impl LookupConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            VocabError::invalid_config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: LookupConfig = serde_json::from_str(&content).map_err(|e| {
            VocabError::invalid_config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.download_timeout_secs == 0 {
            return Err(VocabError::invalid_config(
                "download_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
