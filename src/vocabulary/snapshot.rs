//! Immutable point-in-time view of an exported vocabulary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::vocabulary::concept::Concept;
use crate::vocabulary::language::Language;

/// Export metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// When the export was produced, if the document says so.
    pub created_date: Option<DateTime<Utc>>,
}

/// The vocabulary header of an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub key: Option<i64>,
    pub name: String,
    pub namespace: Option<String>,
    pub label: BTreeMap<Language, String>,
    pub definition: BTreeMap<Language, String>,
}

impl Vocabulary {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Vocabulary {
            key: None,
            name: name.into(),
            namespace: None,
            label: BTreeMap::new(),
            definition: BTreeMap::new(),
        }
    }
}

/// A vocabulary header plus its concepts, in export order.
///
/// Snapshots are never mutated once built; loading a newer export produces a
/// new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularySnapshot {
    metadata: ExportMetadata,
    vocabulary: Vocabulary,
    concepts: Vec<Concept>,
}

impl VocabularySnapshot {
    pub fn new(metadata: ExportMetadata, vocabulary: Vocabulary, concepts: Vec<Concept>) -> Self {
        VocabularySnapshot {
            metadata,
            vocabulary,
            concepts,
        }
    }

    pub fn metadata(&self) -> &ExportMetadata {
        &self.metadata
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}
