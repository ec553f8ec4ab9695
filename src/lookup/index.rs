//! Lookup indices built once from a snapshot.
//!
//! [`LookupIndex::build`] walks the concepts a single time and fills four
//! independent maps. Every map points into the snapshot's concept slice by
//! position ([`ConceptId`]) rather than cloning concepts. There is no
//! insertion API after `build` returns, so the index can be shared by any
//! number of concurrent readers.
//!
//! Collisions on names and hidden labels are data-quality problems, not load
//! failures: they are logged and the later concept wins.

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::analysis::analyzer::ValueAnalyzer;
use crate::vocabulary::concept::{Concept, ConceptKey};
use crate::vocabulary::language::Language;

/// Position of a concept in its snapshot.
pub type ConceptId = usize;

/// Sets up to this size answer membership with a linear scan.
const LINEAR_SET_LIMIT: usize = 16;

/// Insertion-ordered set of concepts.
///
/// Most sets hold a handful of concepts and are searched linearly. A set that
/// grows past [`LINEAR_SET_LIMIT`] also keeps a hash set of its members, so a
/// label shared by many concepts does not make the build quadratic.
#[derive(Debug, Clone, Default)]
pub struct ConceptSet {
    ids: Vec<ConceptId>,
    members: Option<AHashSet<ConceptId>>,
}

impl PartialEq for ConceptSet {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for ConceptSet {}

impl ConceptSet {
    fn insert(&mut self, id: ConceptId) {
        let is_new = match &mut self.members {
            Some(members) => members.insert(id),
            None => !self.ids.contains(&id),
        };
        if !is_new {
            return;
        }

        self.ids.push(id);
        if self.members.is_none() && self.ids.len() > LINEAR_SET_LIMIT {
            self.members = Some(self.ids.iter().copied().collect());
        }
    }

    /// The only concept of the set, if it holds exactly one.
    pub fn single(&self) -> Option<ConceptId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ConceptId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<ConceptId> for ConceptSet {
    fn from_iter<I: IntoIterator<Item = ConceptId>>(iter: I) -> Self {
        let mut set = ConceptSet::default();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Every concept that uses one normalized label value.
#[derive(Debug, Clone, Default)]
pub struct LabelMatches {
    concepts: ConceptSet,
    by_language: AHashMap<Language, ConceptSet>,
}

impl LabelMatches {
    fn insert(&mut self, language: Language, id: ConceptId) {
        self.concepts.insert(id);
        self.by_language.entry(language).or_default().insert(id);
    }

    /// All concepts sharing the value, regardless of language.
    pub fn concepts(&self) -> &ConceptSet {
        &self.concepts
    }

    /// The concepts that use the value in `language`.
    pub fn in_language(&self, language: Language) -> Option<&ConceptSet> {
        self.by_language.get(&language)
    }

    pub fn is_ambiguous(&self) -> bool {
        self.concepts.len() > 1
    }
}

/// Counters collected while building the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub concepts: usize,
    pub names: usize,
    pub label_values: usize,
    pub ambiguous_label_values: usize,
    pub hidden_labels: usize,
    pub duplicate_keys: usize,
    pub name_collisions: usize,
    pub hidden_label_collisions: usize,
    pub skipped_empty_values: usize,
}

/// The four lookup indices of one snapshot.
#[derive(Debug, Default)]
pub struct LookupIndex {
    by_name: AHashMap<String, ConceptId>,
    by_label: AHashMap<String, LabelMatches>,
    by_hidden_label: AHashMap<String, ConceptId>,
    by_key: AHashMap<ConceptKey, ConceptId>,
    stats: IndexStats,
}

impl LookupIndex {
    /// Build the indices for `concepts`.
    ///
    /// Labels and hidden labels go through the full analyzer (prefilter and
    /// normalizer); names are only normalized.
    pub fn build(concepts: &[Concept], analyzer: &ValueAnalyzer) -> Self {
        let mut index = LookupIndex {
            by_name: AHashMap::with_capacity(concepts.len()),
            by_label: AHashMap::with_capacity(concepts.len() * 2),
            by_hidden_label: AHashMap::new(),
            by_key: AHashMap::with_capacity(concepts.len()),
            stats: IndexStats {
                concepts: concepts.len(),
                ..IndexStats::default()
            },
        };

        for (id, concept) in concepts.iter().enumerate() {
            index.index_key(concepts, id, concept);
            index.index_name(concepts, id, concept, analyzer);
            index.index_labels(id, concept, analyzer);
            index.index_hidden_labels(concepts, id, concept, analyzer);
        }

        index.stats.names = index.by_name.len();
        index.stats.label_values = index.by_label.len();
        index.stats.hidden_labels = index.by_hidden_label.len();
        index.stats.ambiguous_label_values = index
            .by_label
            .values()
            .filter(|matches| matches.is_ambiguous())
            .count();

        log::debug!(
            "Built lookup index: {} concepts, {} names, {} label values ({} ambiguous), {} hidden labels",
            index.stats.concepts,
            index.stats.names,
            index.stats.label_values,
            index.stats.ambiguous_label_values,
            index.stats.hidden_labels
        );
        index
    }

    fn index_key(&mut self, concepts: &[Concept], id: ConceptId, concept: &Concept) {
        if let Some(previous) = self.by_key.insert(concept.key, id) {
            self.stats.duplicate_keys += 1;
            log::warn!(
                "Duplicate concept key {}: '{}' replaces '{}'",
                concept.key,
                concept.name,
                concepts[previous].name
            );
        }
    }

    fn index_name(
        &mut self,
        concepts: &[Concept],
        id: ConceptId,
        concept: &Concept,
        analyzer: &ValueAnalyzer,
    ) {
        let normalized = analyzer.analyze_name(&concept.name);
        if normalized.is_empty() {
            self.skip_empty(concept, &concept.name);
            return;
        }

        if let Some(previous) = self.by_name.insert(normalized, id)
            && previous != id
        {
            self.stats.name_collisions += 1;
            log::warn!(
                "Concept name '{}' ({}) normalizes like '{}' ({}); the later concept wins",
                concept.name,
                concept.key,
                concepts[previous].name,
                concepts[previous].key
            );
        }
    }

    fn index_labels(&mut self, id: ConceptId, concept: &Concept, analyzer: &ValueAnalyzer) {
        for (language, value) in concept.matchable_labels() {
            let normalized = analyzer.analyze(value);
            if normalized.is_empty() {
                self.skip_empty(concept, value);
                continue;
            }
            self.by_label
                .entry(normalized)
                .or_default()
                .insert(language, id);
        }
    }

    fn index_hidden_labels(
        &mut self,
        concepts: &[Concept],
        id: ConceptId,
        concept: &Concept,
        analyzer: &ValueAnalyzer,
    ) {
        for value in &concept.hidden_labels {
            let normalized = analyzer.analyze(value);
            if normalized.is_empty() {
                self.skip_empty(concept, value);
                continue;
            }

            if let Some(previous) = self.by_hidden_label.insert(normalized, id)
                && previous != id
            {
                self.stats.hidden_label_collisions += 1;
                log::warn!(
                    "Hidden label '{}' of '{}' ({}) is also a hidden label of '{}' ({}); the later concept wins",
                    value,
                    concept.name,
                    concept.key,
                    concepts[previous].name,
                    concepts[previous].key
                );
            }
        }
    }

    fn skip_empty(&mut self, concept: &Concept, value: &str) {
        self.stats.skipped_empty_values += 1;
        log::debug!(
            "Skipping '{}' of concept '{}' ({}): empty after analysis",
            value,
            concept.name,
            concept.key
        );
    }

    /// Concept whose normalized name is `normalized`.
    pub fn by_name(&self, normalized: &str) -> Option<ConceptId> {
        self.by_name.get(normalized).copied()
    }

    /// Concepts using the normalized label value `normalized`.
    pub fn by_label(&self, normalized: &str) -> Option<&LabelMatches> {
        self.by_label.get(normalized)
    }

    /// Concept owning the normalized hidden label `normalized`.
    pub fn by_hidden_label(&self, normalized: &str) -> Option<ConceptId> {
        self.by_hidden_label.get(normalized).copied()
    }

    /// Concept with key `key`.
    pub fn by_key(&self, key: ConceptKey) -> Option<ConceptId> {
        self.by_key.get(&key).copied()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Normalized label values shared by more than one concept, sorted by value.
    pub fn ambiguous_labels(&self) -> Vec<(&str, &LabelMatches)> {
        let mut ambiguous: Vec<_> = self
            .by_label
            .iter()
            .filter(|(_, matches)| matches.is_ambiguous())
            .map(|(value, matches)| (value.as_str(), matches))
            .collect();
        ambiguous.sort_unstable_by(|a, b| a.0.cmp(b.0));
        ambiguous
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::prefilter;

    fn concepts() -> Vec<Concept> {
        vec![
            Concept::new(1, "Adult")
                .with_label(Language::English, "Adult")
                .with_label(Language::Spanish, "Adulto")
                .with_alternative_label(Language::English, "adult")
                .with_hidden_label("imago"),
            Concept::new(2, "Juvenile")
                .with_label(Language::English, "Juvenile")
                .with_misapplied_label(Language::Spanish, "adulto"),
            Concept::new(3, "Larva").with_parent(2),
        ]
    }

    #[test]
    fn test_build_indices() {
        let concepts = concepts();
        let index = LookupIndex::build(&concepts, &ValueAnalyzer::default());

        assert_eq!(index.by_key(3), Some(2));
        assert_eq!(index.by_key(42), None);
        assert_eq!(index.by_name("juvenile"), Some(1));
        assert_eq!(index.by_hidden_label("imago"), Some(0));

        let adult = index.by_label("adult").unwrap();
        assert_eq!(adult.concepts().single(), Some(0));
        assert_eq!(adult.in_language(Language::English).unwrap().len(), 1);

        let adulto = index.by_label("adulto").unwrap();
        assert!(adulto.is_ambiguous());
        assert_eq!(adulto.in_language(Language::Spanish).unwrap().len(), 2);
        assert!(adulto.in_language(Language::English).is_none());
    }

    #[test]
    fn test_stats() {
        let concepts = concepts();
        let index = LookupIndex::build(&concepts, &ValueAnalyzer::default());
        let stats = index.stats();

        assert_eq!(stats.concepts, 3);
        assert_eq!(stats.names, 3);
        assert_eq!(stats.label_values, 3);
        assert_eq!(stats.ambiguous_label_values, 1);
        assert_eq!(stats.hidden_labels, 1);
        assert_eq!(stats.name_collisions, 0);

        let ambiguous = index.ambiguous_labels();
        assert_eq!(ambiguous.len(), 1);
        assert_eq!(ambiguous[0].0, "adulto");
    }

    #[test]
    fn test_name_collision_last_write_wins() {
        let concepts = vec![Concept::new(1, "Sub-adult"), Concept::new(2, "subadult")];
        let index = LookupIndex::build(&concepts, &ValueAnalyzer::default());

        assert_eq!(index.by_name("subadult"), Some(1));
        assert_eq!(index.stats().name_collisions, 1);
    }

    #[test]
    fn test_hidden_label_collision_last_write_wins() {
        let concepts = vec![
            Concept::new(1, "A").with_hidden_label("x").with_hidden_label("X"),
            Concept::new(2, "B").with_hidden_label("x"),
        ];
        let index = LookupIndex::build(&concepts, &ValueAnalyzer::default());

        assert_eq!(index.by_hidden_label("x"), Some(1));
        // Repeating a hidden label on the same concept is not a collision.
        assert_eq!(index.stats().hidden_label_collisions, 1);
    }

    #[test]
    fn test_duplicate_keys() {
        let concepts = vec![Concept::new(1, "A"), Concept::new(1, "B")];
        let index = LookupIndex::build(&concepts, &ValueAnalyzer::default());

        assert_eq!(index.by_key(1), Some(1));
        assert_eq!(index.stats().duplicate_keys, 1);
    }

    #[test]
    fn test_prefilter_applies_to_labels_not_names() {
        let concepts = vec![
            Concept::new(1, "Stage (1)").with_label(Language::English, "Adult (estimate)"),
        ];
        let analyzer = ValueAnalyzer::default()
            .with_prefilter(Some(Arc::new(prefilter::remove_parenthesis_suffix())));
        let index = LookupIndex::build(&concepts, &analyzer);

        assert!(index.by_label("adult").is_some());
        assert!(index.by_label("adult(estimate)").is_none());
        assert_eq!(index.by_name("stage(1)"), Some(0));
    }

    #[test]
    fn test_empty_values_skipped() {
        let concepts = vec![
            Concept::new(1, "A")
                .with_label(Language::English, "123")
                .with_hidden_label("  "),
        ];
        let analyzer = ValueAnalyzer::default()
            .with_prefilter(Some(Arc::new(prefilter::remove_numeric())));
        let index = LookupIndex::build(&concepts, &analyzer);

        assert_eq!(index.stats().label_values, 0);
        assert_eq!(index.stats().hidden_labels, 0);
        assert_eq!(index.stats().skipped_empty_values, 2);
    }

    #[test]
    fn test_large_concept_set() {
        let mut set = ConceptSet::default();
        for round in 0..2 {
            for id in (0..1_000).rev() {
                set.insert(id);
            }
            assert_eq!(set.len(), 1_000, "round {round}");
        }
        assert_eq!(set.iter().next(), Some(999));
        assert_eq!(set.iter().last(), Some(0));
        assert_eq!(set.single(), None);

        let small: ConceptSet = (0..1_000).rev().collect();
        assert_eq!(set, small);
    }

    #[test]
    fn test_label_shared_by_many_concepts() {
        let concepts: Vec<Concept> = (0..200)
            .map(|key| Concept::new(key, format!("C{key}")).with_label(Language::English, "common"))
            .collect();
        let index = LookupIndex::build(&concepts, &ValueAnalyzer::default());

        let matches = index.by_label("common").unwrap();
        assert_eq!(matches.concepts().len(), 200);
        assert_eq!(matches.in_language(Language::English).unwrap().len(), 200);
        assert_eq!(index.stats().ambiguous_label_values, 1);
    }

    #[test]
    fn test_concept_set() {
        let set: ConceptSet = [3, 1, 3].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(set.single(), None);
        assert_eq!(ConceptSet::from_iter([5]).single(), Some(5));
        assert!(ConceptSet::default().is_empty());
    }
}
