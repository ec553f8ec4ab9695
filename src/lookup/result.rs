//! Lookup results and ancestor-chain assembly.

use ahash::AHashSet;

use crate::lookup::index::{ConceptId, LookupIndex};
use crate::lookup::resolver::MatchKind;
use crate::vocabulary::concept::{Concept, ConceptKey};
use crate::vocabulary::language::Language;

/// A resolved concept together with its ancestors.
///
/// Results borrow from the engine that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult<'a> {
    concept: &'a Concept,
    parents: Vec<&'a Concept>,
    matched_by: MatchKind,
}

impl<'a> LookupResult<'a> {
    /// Assemble the result for the concept at `id`.
    ///
    /// Parents are collected nearest first by following `parent_key` through
    /// the by-key index. The walk stops at a key the index does not know or
    /// at a key it has already visited, so a malformed cyclic hierarchy cannot
    /// loop forever.
    pub fn assemble(
        concepts: &'a [Concept],
        index: &LookupIndex,
        id: ConceptId,
        matched_by: MatchKind,
    ) -> Self {
        let concept = &concepts[id];
        let mut parents = Vec::new();
        let mut visited: AHashSet<ConceptKey> = AHashSet::new();
        visited.insert(concept.key);

        let mut next = concept.parent_key;
        while let Some(parent_key) = next {
            if !visited.insert(parent_key) {
                log::warn!(
                    "Cycle in the parents of '{}' ({}) at key {}",
                    concept.name,
                    concept.key,
                    parent_key
                );
                break;
            }
            let Some(parent_id) = index.by_key(parent_key) else {
                break;
            };
            let parent = &concepts[parent_id];
            parents.push(parent);
            next = parent.parent_key;
        }

        LookupResult {
            concept,
            parents,
            matched_by,
        }
    }

    pub fn concept(&self) -> &'a Concept {
        self.concept
    }

    pub fn key(&self) -> ConceptKey {
        self.concept.key
    }

    pub fn name(&self) -> &'a str {
        &self.concept.name
    }

    /// Ancestors of the concept, nearest parent first.
    pub fn parents(&self) -> &[&'a Concept] {
        &self.parents
    }

    /// Names of the ancestors, nearest parent first, as stored.
    pub fn ancestor_names(&self) -> Vec<&'a str> {
        self.parents.iter().map(|parent| parent.name.as_str()).collect()
    }

    /// Tags of the concept, as stored.
    pub fn tags(&self) -> &'a [String] {
        &self.concept.tags
    }

    pub fn matched_by(&self) -> MatchKind {
        self.matched_by
    }

    /// Label of the concept in `language`, falling back to English.
    pub fn label(&self, language: Language) -> Option<&'a str> {
        self.concept.label_or_english(language)
    }
}
