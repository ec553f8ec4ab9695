use std::borrow::Cow;

use regex::Regex;

use super::Prefilter;
use crate::error::{Result, VocabError};

/// A prefilter that replaces every match of a regex pattern.
#[derive(Clone, Debug)]
pub struct PatternReplacePrefilter {
    pattern: Regex,
    replacement: String,
    name: &'static str,
}

impl PatternReplacePrefilter {
    /// Create a new pattern replace prefilter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| VocabError::Anyhow(anyhow::Error::from(e)))?,
            replacement: replacement.to_string(),
            name: "pattern_replace",
        })
    }

    /// Create a prefilter from an already compiled regex.
    pub(crate) fn from_regex(pattern: Regex, replacement: &str, name: &'static str) -> Self {
        Self {
            pattern,
            replacement: replacement.to_string(),
            name,
        }
    }

    /// Get the pattern of this prefilter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Prefilter for PatternReplacePrefilter {
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        // `replace_all` borrows when nothing matched.
        self.pattern.replace_all(input, self.replacement.as_str())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
