//! The vocabulary lookup engine.
//!
//! A [`VocabularyLookup`] is built once from an export and then answers
//! lookups from any number of threads. All mutation happens inside
//! [`VocabularyLookupBuilder::build`]; afterwards the snapshot and its indices
//! are only read. [`VocabularyLookup::close`] needs exclusive access, so it
//! cannot race with lookups in flight.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vocab_lookup::analysis::prefilter;
//! use vocab_lookup::lookup::engine::VocabularyLookup;
//! use vocab_lookup::vocabulary::language::Language;
//!
//! let export = br#"{
//!     "metadata": { "createdDate": "2024-03-01T10:00:00Z" },
//!     "vocabulary": { "name": "LifeStage" },
//!     "concepts": [
//!         { "key": 1, "name": "Adult", "label": { "es": "adulto" } }
//!     ]
//! }"#;
//!
//! let lookup = VocabularyLookup::builder()
//!     .from_bytes(export.to_vec())
//!     .with_prefilter(Arc::new(prefilter::remove_parenthesis_suffix()))
//!     .with_prefilter(Arc::new(prefilter::remove_numeric_prefix()))
//!     .build()
//!     .unwrap();
//!
//! let result = lookup.lookup("1 adult(s)", None).unwrap();
//! assert_eq!(result.name(), "Adult");
//!
//! let result = lookup.lookup("Adulto", Some(Language::Spanish)).unwrap();
//! assert_eq!(result.key(), 1);
//!
//! assert!(lookup.lookup("subadult", None).is_none());
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::analyzer::ValueAnalyzer;
use crate::analysis::normalizer::{DefaultNormalizer, Normalizer};
use crate::analysis::prefilter::{Prefilter, PrefilterChain, PrefilterKind};
use crate::error::{Result, VocabError};
use crate::lookup::config::LookupConfig;
use crate::lookup::index::{IndexStats, LookupIndex};
use crate::lookup::resolver::Resolver;
use crate::lookup::result::LookupResult;
use crate::vocabulary::concept::{Concept, ConceptKey};
use crate::vocabulary::language::Language;
use crate::vocabulary::loader::{parse_snapshot, read_snapshot_file};
use crate::vocabulary::snapshot::{ExportMetadata, Vocabulary, VocabularySnapshot};

/// Where the export a lookup engine is built from comes from.
pub enum SnapshotSource {
    /// An export document held in memory.
    Bytes(Vec<u8>),
    /// An export document on disk.
    Path(PathBuf),
    /// An already parsed snapshot.
    Snapshot(VocabularySnapshot),
    /// The latest released export of a vocabulary, downloaded from a
    /// vocabulary registry API.
    #[cfg(feature = "remote")]
    Remote {
        api_url: String,
        vocabulary_name: String,
    },
}

impl fmt::Debug for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            SnapshotSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            SnapshotSource::Snapshot(snapshot) => write!(
                f,
                "Snapshot({}, {} concepts)",
                snapshot.vocabulary().name,
                snapshot.len()
            ),
            #[cfg(feature = "remote")]
            SnapshotSource::Remote {
                api_url,
                vocabulary_name,
            } => f
                .debug_struct("Remote")
                .field("api_url", api_url)
                .field("vocabulary_name", vocabulary_name)
                .finish(),
        }
    }
}

impl SnapshotSource {
    #[cfg_attr(not(feature = "remote"), allow(unused_variables))]
    fn load(self, timeout: Duration) -> Result<VocabularySnapshot> {
        match self {
            SnapshotSource::Bytes(bytes) => parse_snapshot(&bytes),
            SnapshotSource::Path(path) => read_snapshot_file(path),
            SnapshotSource::Snapshot(snapshot) => Ok(snapshot),
            #[cfg(feature = "remote")]
            SnapshotSource::Remote {
                api_url,
                vocabulary_name,
            } => {
                let client = crate::vocabulary::remote::RemoteExportClient::new(api_url, timeout)?;
                parse_snapshot(&client.fetch_latest_export(&vocabulary_name)?)
            }
        }
    }
}

/// A label value shared by several concepts.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousLabel<'a> {
    /// The normalized label value.
    pub value: &'a str,
    /// Every concept using the value.
    pub concepts: Vec<&'a Concept>,
}

#[derive(Debug)]
struct LoadedVocabulary {
    snapshot: VocabularySnapshot,
    index: LookupIndex,
}

/// In-memory lookup engine over one vocabulary snapshot.
#[derive(Debug)]
pub struct VocabularyLookup {
    loaded: Option<LoadedVocabulary>,
    analyzer: ValueAnalyzer,
    fallback_language: Language,
}

impl VocabularyLookup {
    /// Create a new builder.
    pub fn builder() -> VocabularyLookupBuilder {
        VocabularyLookupBuilder::new()
    }

    /// Build an engine with default settings from an export held in memory.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        Self::load_with_config(bytes, &LookupConfig::default())
    }

    /// Build an engine from an export held in memory.
    pub fn load_with_config(bytes: &[u8], config: &LookupConfig) -> Result<Self> {
        config.validate()?;
        let snapshot = parse_snapshot(bytes)?;
        VocabularyLookupBuilder::new()
            .with_config(config)
            .from_snapshot(snapshot)
            .build()
    }

    /// Build an engine with default settings from an export file.
    pub fn load_from_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        VocabularyLookupBuilder::new().from_path(path).build()
    }

    /// Build an engine with default settings from the latest released export
    /// of `vocabulary_name` at `api_url`.
    #[cfg(feature = "remote")]
    pub fn load_from_api<S: Into<String>, N: Into<String>>(
        api_url: S,
        vocabulary_name: N,
    ) -> Result<Self> {
        VocabularyLookupBuilder::new()
            .from_api(api_url, vocabulary_name)
            .build()
    }

    fn from_parts(
        snapshot: VocabularySnapshot,
        analyzer: ValueAnalyzer,
        fallback_language: Language,
    ) -> Self {
        let index = LookupIndex::build(snapshot.concepts(), &analyzer);
        VocabularyLookup {
            loaded: Some(LoadedVocabulary { snapshot, index }),
            analyzer,
            fallback_language,
        }
    }

    /// Resolve `value` to a concept.
    ///
    /// `context` breaks ties between concepts sharing a label; without it only
    /// the fallback language is consulted. Returns `None` when nothing
    /// matches, when the value is empty, when an ambiguity cannot be settled
    /// and after [`close`](Self::close).
    pub fn lookup(&self, value: &str, context: Option<Language>) -> Option<LookupResult<'_>> {
        let loaded = self.loaded.as_ref()?;
        let concepts = loaded.snapshot.concepts();
        let resolver = Resolver::new(
            concepts,
            &loaded.index,
            &self.analyzer,
            self.fallback_language,
        );
        let (id, matched_by) = resolver.resolve(value, context)?;
        Some(LookupResult::assemble(concepts, &loaded.index, id, matched_by))
    }

    /// Release the snapshot and its indices. Calling it again does nothing.
    pub fn close(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            log::debug!(
                "Closed lookup over vocabulary '{}'",
                loaded.snapshot.vocabulary().name
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.loaded.is_none()
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.loaded.as_ref().map(|loaded| loaded.snapshot.vocabulary())
    }

    pub fn metadata(&self) -> Option<&ExportMetadata> {
        self.loaded.as_ref().map(|loaded| loaded.snapshot.metadata())
    }

    /// All concepts in export order.
    pub fn concepts(&self) -> &[Concept] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.snapshot.concepts())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.concepts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts().is_empty()
    }

    pub fn concept_by_key(&self, key: ConceptKey) -> Option<&Concept> {
        let loaded = self.loaded.as_ref()?;
        let id = loaded.index.by_key(key)?;
        loaded.snapshot.concepts().get(id)
    }

    /// Concept whose name matches `name` after normalization. Labels are not
    /// consulted.
    pub fn concept_by_name(&self, name: &str) -> Option<&Concept> {
        let loaded = self.loaded.as_ref()?;
        let id = loaded.index.by_name(&self.analyzer.analyze_name(name))?;
        loaded.snapshot.concepts().get(id)
    }

    pub fn stats(&self) -> IndexStats {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.index.stats().clone())
            .unwrap_or_default()
    }

    /// Label values shared by more than one concept, sorted by value.
    pub fn ambiguous_labels(&self) -> Vec<AmbiguousLabel<'_>> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Vec::new();
        };
        let concepts = loaded.snapshot.concepts();
        loaded
            .index
            .ambiguous_labels()
            .into_iter()
            .map(|(value, matches)| AmbiguousLabel {
                value,
                concepts: matches.concepts().iter().map(|id| &concepts[id]).collect(),
            })
            .collect()
    }

    pub fn analyzer(&self) -> &ValueAnalyzer {
        &self.analyzer
    }

    pub fn fallback_language(&self) -> Language {
        self.fallback_language
    }
}

/// Builder for [`VocabularyLookup`].
#[derive(Debug)]
pub struct VocabularyLookupBuilder {
    source: Option<SnapshotSource>,
    prefilter: Option<Arc<dyn Prefilter>>,
    normalizer: Option<Arc<dyn Normalizer>>,
    fallback_language: Language,
    timeout: Duration,
}

impl Default for VocabularyLookupBuilder {
    fn default() -> Self {
        let config = LookupConfig::default();
        VocabularyLookupBuilder {
            source: None,
            prefilter: None,
            normalizer: None,
            fallback_language: config.fallback_language,
            timeout: config.download_timeout(),
        }
    }
}

impl VocabularyLookupBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot source, replacing any previous one.
    pub fn source(mut self, source: SnapshotSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Load from an export held in memory.
    pub fn from_bytes(self, bytes: Vec<u8>) -> Self {
        self.source(SnapshotSource::Bytes(bytes))
    }

    /// Load from an export file.
    pub fn from_path<P: Into<PathBuf>>(self, path: P) -> Self {
        self.source(SnapshotSource::Path(path.into()))
    }

    /// Use an already parsed snapshot.
    pub fn from_snapshot(self, snapshot: VocabularySnapshot) -> Self {
        self.source(SnapshotSource::Snapshot(snapshot))
    }

    /// Download the latest released export of `vocabulary_name` from `api_url`.
    #[cfg(feature = "remote")]
    pub fn from_api<S: Into<String>, N: Into<String>>(self, api_url: S, vocabulary_name: N) -> Self {
        self.source(SnapshotSource::Remote {
            api_url: api_url.into(),
            vocabulary_name: vocabulary_name.into(),
        })
    }

    /// Add a prefilter. It runs after any prefilter added before it.
    pub fn with_prefilter(mut self, prefilter: Arc<dyn Prefilter>) -> Self {
        self.prefilter = Some(match self.prefilter.take() {
            Some(existing) => Arc::new(
                PrefilterChain::new()
                    .add_prefilter(existing)
                    .add_prefilter(prefilter),
            ),
            None => prefilter,
        });
        self
    }

    /// Replace the default normalizer.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_fallback_language(mut self, language: Language) -> Self {
        self.fallback_language = language;
        self
    }

    /// Timeout for each HTTP request made by a remote source.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply every setting of `config`. Its prefilters are added after any
    /// prefilter already configured.
    pub fn with_config(mut self, config: &LookupConfig) -> Self {
        if let Some(prefilter) = PrefilterKind::compose(&config.prefilters) {
            self = self.with_prefilter(prefilter);
        }
        self.with_fallback_language(config.fallback_language)
            .with_timeout(config.download_timeout())
    }

    /// Load the snapshot and build the indices.
    pub fn build(self) -> Result<VocabularyLookup> {
        if self.timeout.is_zero() {
            return Err(VocabError::invalid_config(
                "download timeout must be greater than zero",
            ));
        }
        let source = self
            .source
            .ok_or_else(|| VocabError::invalid_config("no snapshot source selected"))?;
        let snapshot = source.load(self.timeout)?;

        let normalizer = self
            .normalizer
            .unwrap_or_else(|| Arc::new(DefaultNormalizer::new()));
        let analyzer = ValueAnalyzer::new(normalizer).with_prefilter(self.prefilter);

        Ok(VocabularyLookup::from_parts(
            snapshot,
            analyzer,
            self.fallback_language,
        ))
    }
}
