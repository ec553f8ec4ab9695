//! Concepts of a loaded vocabulary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vocabulary::language::Language;

/// Identifier of a concept, unique within a snapshot.
pub type ConceptKey = i64;

/// A single controlled term of a vocabulary.
///
/// Labels, alternative labels and misapplied labels are all valid textual
/// forms of the concept for matching purposes. Hidden labels are matched too
/// but never shown to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub key: ConceptKey,
    pub parent_key: Option<ConceptKey>,
    pub name: String,
    pub label: BTreeMap<Language, String>,
    pub alternative_labels: BTreeMap<Language, Vec<String>>,
    pub misapplied_labels: BTreeMap<Language, Vec<String>>,
    pub hidden_labels: Vec<String>,
    pub definition: BTreeMap<Language, String>,
    pub tags: Vec<String>,
}

impl Concept {
    /// Create a concept with no labels, parent or tags.
    pub fn new<S: Into<String>>(key: ConceptKey, name: S) -> Self {
        Concept {
            key,
            parent_key: None,
            name: name.into(),
            label: BTreeMap::new(),
            alternative_labels: BTreeMap::new(),
            misapplied_labels: BTreeMap::new(),
            hidden_labels: Vec::new(),
            definition: BTreeMap::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_key: ConceptKey) -> Self {
        self.parent_key = Some(parent_key);
        self
    }

    pub fn with_label<S: Into<String>>(mut self, language: Language, label: S) -> Self {
        self.label.insert(language, label.into());
        self
    }

    pub fn with_alternative_label<S: Into<String>>(mut self, language: Language, label: S) -> Self {
        self.alternative_labels
            .entry(language)
            .or_default()
            .push(label.into());
        self
    }

    pub fn with_misapplied_label<S: Into<String>>(mut self, language: Language, label: S) -> Self {
        self.misapplied_labels
            .entry(language)
            .or_default()
            .push(label.into());
        self
    }

    pub fn with_hidden_label<S: Into<String>>(mut self, label: S) -> Self {
        self.hidden_labels.push(label.into());
        self
    }

    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get the label in `language`, falling back to English.
    pub fn label_or_english(&self, language: Language) -> Option<&str> {
        self.label
            .get(&language)
            .or_else(|| self.label.get(&Language::English))
            .map(String::as_str)
    }

    /// Iterate every `(language, value)` pair that identifies this concept:
    /// the label, each alternative label and each misapplied label.
    pub fn matchable_labels(&self) -> impl Iterator<Item = (Language, &str)> {
        let labels = self
            .label
            .iter()
            .map(|(language, value)| (*language, value.as_str()));
        let alternatives = self.alternative_labels.iter().flat_map(|(language, values)| {
            values.iter().map(move |value| (*language, value.as_str()))
        });
        let misapplied = self.misapplied_labels.iter().flat_map(|(language, values)| {
            values.iter().map(move |value| (*language, value.as_str()))
        });
        labels.chain(alternatives).chain(misapplied)
    }
}
