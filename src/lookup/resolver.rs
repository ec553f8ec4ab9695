//! Resolution of a raw value to a single concept.
//!
//! The resolver analyzes the value (prefilter, then normalizer) and queries
//! the indices in a fixed priority order:
//!
//! 1. by name: a name match always wins
//! 2. by label, with [`disambiguate`] when the label is shared
//! 3. by hidden label
//!
//! An ambiguity that [`disambiguate`] cannot settle is treated like a miss on
//! the label index: it is logged and resolution moves on to hidden labels.

use serde::Serialize;

use crate::analysis::analyzer::ValueAnalyzer;
use crate::lookup::index::{ConceptId, ConceptSet, LabelMatches, LookupIndex};
use crate::vocabulary::concept::Concept;
use crate::vocabulary::language::Language;

/// Which index produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Name,
    Label,
    HiddenLabel,
}

/// Languages whose match sets are consulted, in order, to settle an
/// ambiguous label: the context language if given, then `fallback` unless it
/// was the context language already.
pub fn candidate_languages(
    context: Option<Language>,
    fallback: Language,
) -> impl Iterator<Item = Language> {
    let retry = (context != Some(fallback)).then_some(fallback);
    context.into_iter().chain(retry)
}

/// Pick the one concept a shared label refers to, if the languages allow it.
///
/// Returns the first candidate language whose match set holds exactly one
/// concept. A label used by a single concept needs no disambiguation and is
/// returned directly.
pub fn disambiguate(
    matches: &LabelMatches,
    context: Option<Language>,
    fallback: Language,
) -> Option<ConceptId> {
    if let Some(id) = matches.concepts().single() {
        return Some(id);
    }
    candidate_languages(context, fallback).find_map(|language| {
        matches
            .in_language(language)
            .and_then(ConceptSet::single)
    })
}

/// Read-only view over one snapshot's index.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    concepts: &'a [Concept],
    index: &'a LookupIndex,
    analyzer: &'a ValueAnalyzer,
    fallback: Language,
}

impl<'a> Resolver<'a> {
    pub fn new(
        concepts: &'a [Concept],
        index: &'a LookupIndex,
        analyzer: &'a ValueAnalyzer,
        fallback: Language,
    ) -> Self {
        Resolver {
            concepts,
            index,
            analyzer,
            fallback,
        }
    }

    /// Resolve `value`, using `context` to break label ties.
    pub fn resolve(
        &self,
        value: &str,
        context: Option<Language>,
    ) -> Option<(ConceptId, MatchKind)> {
        if value.trim().is_empty() {
            return None;
        }

        let normalized = self.analyzer.analyze(value);
        if normalized.is_empty() {
            return None;
        }

        if let Some(id) = self.index.by_name(&normalized) {
            return Some((id, MatchKind::Name));
        }

        if let Some(matches) = self.index.by_label(&normalized) {
            match disambiguate(matches, context, self.fallback) {
                Some(id) => return Some((id, MatchKind::Label)),
                None => self.log_ambiguity(value, context, matches),
            }
        }

        self.index
            .by_hidden_label(&normalized)
            .map(|id| (id, MatchKind::HiddenLabel))
    }

    fn log_ambiguity(&self, value: &str, context: Option<Language>, matches: &LabelMatches) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let candidates: Vec<&str> = matches
            .concepts()
            .iter()
            .map(|id| self.concepts[id].name.as_str())
            .collect();
        log::debug!(
            "Ambiguous value '{}' (context language {:?}) matches {:?}; no match returned",
            value,
            context,
            candidates
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::prefilter::{self, Prefilter};

    fn concepts() -> Vec<Concept> {
        vec![
            Concept::new(1, "Adult")
                .with_label(Language::English, "Adult")
                .with_label(Language::Spanish, "Adulto"),
            Concept::new(2, "Juvenile")
                .with_label(Language::English, "Juvenile")
                .with_label(Language::Spanish, "Juvenil")
                .with_alternative_label(Language::French, "adulte"),
            Concept::new(3, "Teneral")
                .with_label(Language::English, "adulte")
                .with_hidden_label("callow"),
            Concept::new(4, "Egg").with_label(Language::German, "ei"),
            Concept::new(5, "Ovum").with_label(Language::German, "ei"),
            Concept::new(6, "Juvenil").with_label(Language::English, "young"),
        ]
    }

    fn resolve(
        concepts: &[Concept],
        value: &str,
        context: Option<Language>,
    ) -> Option<(i64, MatchKind)> {
        let analyzer = ValueAnalyzer::default();
        let index = LookupIndex::build(concepts, &analyzer);
        let resolver = Resolver::new(concepts, &index, &analyzer, Language::English);
        resolver
            .resolve(value, context)
            .map(|(id, kind)| (concepts[id].key, kind))
    }

    #[test]
    fn test_candidate_languages() {
        let order: Vec<_> = candidate_languages(Some(Language::French), Language::English).collect();
        assert_eq!(order, vec![Language::French, Language::English]);

        let order: Vec<_> = candidate_languages(Some(Language::English), Language::English).collect();
        assert_eq!(order, vec![Language::English]);

        let order: Vec<_> = candidate_languages(None, Language::English).collect();
        assert_eq!(order, vec![Language::English]);
    }

    #[test]
    fn test_name_match() {
        let concepts = concepts();
        assert_eq!(resolve(&concepts, "ADULT", None), Some((1, MatchKind::Name)));
    }

    #[test]
    fn test_name_beats_label() {
        // "Juvenil" is the Spanish label of Juvenile and the name of concept 6.
        let concepts = concepts();
        assert_eq!(
            resolve(&concepts, "juvenil", Some(Language::Spanish)),
            Some((6, MatchKind::Name))
        );
    }

    #[test]
    fn test_unambiguous_label() {
        let concepts = concepts();
        for context in [None, Some(Language::English), Some(Language::Japanese)] {
            assert_eq!(
                resolve(&concepts, "Adulto", context),
                Some((1, MatchKind::Label))
            );
        }
    }

    #[test]
    fn test_language_disambiguation() {
        let concepts = concepts();
        assert_eq!(
            resolve(&concepts, "adulte", Some(Language::French)),
            Some((2, MatchKind::Label))
        );
        assert_eq!(
            resolve(&concepts, "adulte", Some(Language::English)),
            Some((3, MatchKind::Label))
        );
        // No context: English settles it.
        assert_eq!(resolve(&concepts, "adulte", None), Some((3, MatchKind::Label)));
        // Context language without a match set falls back to English.
        assert_eq!(
            resolve(&concepts, "adulte", Some(Language::Italian)),
            Some((3, MatchKind::Label))
        );
    }

    #[test]
    fn test_unresolved_ambiguity() {
        let concepts = concepts();
        assert_eq!(resolve(&concepts, "ei", None), None);
        assert_eq!(resolve(&concepts, "ei", Some(Language::German)), None);
    }

    #[test]
    fn test_hidden_label_fallback() {
        let concepts = concepts();
        assert_eq!(
            resolve(&concepts, "Callow", None),
            Some((3, MatchKind::HiddenLabel))
        );
    }

    #[test]
    fn test_ambiguity_falls_through_to_hidden_label() {
        let concepts = vec![
            Concept::new(1, "A").with_label(Language::German, "x"),
            Concept::new(2, "B").with_label(Language::German, "x"),
            Concept::new(3, "C").with_hidden_label("x"),
        ];
        assert_eq!(resolve(&concepts, "x", None), Some((3, MatchKind::HiddenLabel)));
    }

    #[test]
    fn test_empty_value() {
        let concepts = concepts();
        assert_eq!(resolve(&concepts, "", None), None);
        assert_eq!(resolve(&concepts, "   ", None), None);
        assert_eq!(resolve(&concepts, "subadult", None), None);
    }

    #[test]
    fn test_prefiltered_value_matches_name() {
        let concepts = concepts();
        let analyzer = ValueAnalyzer::default().with_prefilter(Some(Arc::new(
            prefilter::remove_parenthesis_suffix().and_then(prefilter::remove_numeric_prefix()),
        )));
        let index = LookupIndex::build(&concepts, &analyzer);
        let resolver = Resolver::new(&concepts, &index, &analyzer, Language::English);

        let (id, kind) = resolver.resolve("1 adult(s)", None).unwrap();
        assert_eq!(concepts[id].key, 1);
        assert_eq!(kind, MatchKind::Name);
    }

    #[test]
    fn test_disambiguate_single() {
        let concepts = concepts();
        let analyzer = ValueAnalyzer::default();
        let index = LookupIndex::build(&concepts, &analyzer);
        let matches = index.by_label("young").unwrap();
        assert_eq!(disambiguate(matches, Some(Language::Korean), Language::English), Some(5));
    }
}
