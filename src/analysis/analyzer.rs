//! Value analyzer that combines the prefilter with the normalizer.
//!
//! The analyzer applies processing in this order:
//! 1. Prefilter: rewrites the raw value (optional)
//! 2. Normalizer: folds case, diacritics and separators
//!
//! Concept names skip step 1; every label, hidden label and query value goes
//! through both steps.

use std::sync::Arc;

use crate::analysis::normalizer::{DefaultNormalizer, Normalizer};
use crate::analysis::prefilter::Prefilter;

/// Turns raw values into index keys.
#[derive(Clone, Debug)]
pub struct ValueAnalyzer {
    prefilter: Option<Arc<dyn Prefilter>>,
    normalizer: Arc<dyn Normalizer>,
}

impl Default for ValueAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(DefaultNormalizer::new()))
    }
}

impl ValueAnalyzer {
    /// Create an analyzer with the given normalizer and no prefilter.
    pub fn new(normalizer: Arc<dyn Normalizer>) -> Self {
        ValueAnalyzer {
            prefilter: None,
            normalizer,
        }
    }

    /// Set the prefilter, replacing any previous one.
    pub fn with_prefilter(mut self, prefilter: Option<Arc<dyn Prefilter>>) -> Self {
        self.prefilter = prefilter;
        self
    }

    /// Get the prefilter used by this analyzer.
    pub fn prefilter(&self) -> Option<&Arc<dyn Prefilter>> {
        self.prefilter.as_ref()
    }

    /// Get the normalizer used by this analyzer.
    pub fn normalizer(&self) -> &Arc<dyn Normalizer> {
        &self.normalizer
    }

    /// Prefilter then normalize a label, hidden label or query value.
    pub fn analyze(&self, value: &str) -> String {
        match &self.prefilter {
            Some(prefilter) => self.normalizer.normalize(&prefilter.apply(value)),
            None => self.normalizer.normalize(value),
        }
    }

    /// Normalize a concept name. Names are never prefiltered.
    pub fn analyze_name(&self, name: &str) -> String {
        self.normalizer.normalize(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prefilter;

    #[test]
    fn test_analyze_without_prefilter() {
        let analyzer = ValueAnalyzer::default();
        assert!(analyzer.prefilter().is_none());
        assert_eq!(analyzer.analyze("Adult (estimate)"), "adult(estimate)");
    }

    #[test]
    fn test_analyze_with_prefilter() {
        let analyzer = ValueAnalyzer::default()
            .with_prefilter(Some(Arc::new(prefilter::remove_parenthesis_suffix())));
        assert_eq!(analyzer.analyze("Adult (estimate)"), "adult");
        assert_eq!(analyzer.analyze("Adult"), "adult");
    }

    #[test]
    fn test_names_skip_prefilter() {
        let analyzer = ValueAnalyzer::default()
            .with_prefilter(Some(Arc::new(prefilter::remove_numeric())));
        assert_eq!(analyzer.analyze("stage 2"), "stage");
        assert_eq!(analyzer.analyze_name("stage 2"), "stage2");
    }
}
