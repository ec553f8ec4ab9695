//! Export document parsing.
//!
//! The loader turns the JSON export of a vocabulary into a
//! [`VocabularySnapshot`]. Structural problems (empty input, bad JSON,
//! missing `vocabulary` or `concepts`, wrongly typed members) fail the load.
//! Data-quality problems (labels in unsupported languages, an unreadable
//! `createdDate`) are logged and skipped. A second label whose locale folds
//! into an already labelled language (`en` and `en-GB`) is logged and kept as
//! an alternative label of that language.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "metadata":   { "createdDate": "2024-03-01T10:00:00Z" },
//!   "vocabulary": { "name": "LifeStage", "label": { "en": "Life stage" } },
//!   "concepts":   [ { "key": 1, "parentKey": null, "name": "Adult",
//!                     "label": { "en": "Adult" },
//!                     "alternativeLabels": { "es": ["adulto"] },
//!                     "misappliedLabels": { "en": ["adlt"] },
//!                     "hiddenLabels": ["imago"],
//!                     "tags": ["stage"] } ]
//! }
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, VocabError};
use crate::vocabulary::concept::Concept;
use crate::vocabulary::language::Language;
use crate::vocabulary::snapshot::{ExportMetadata, Vocabulary, VocabularySnapshot};

#[derive(Debug, Deserialize)]
struct ExportDocument {
    #[serde(default)]
    metadata: Option<RawMetadata>,
    vocabulary: RawVocabulary,
    concepts: Vec<RawConcept>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    #[serde(default)]
    created_date: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVocabulary {
    #[serde(default)]
    key: Option<i64>,
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    label: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    definition: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConcept {
    key: i64,
    #[serde(default)]
    parent_key: Option<i64>,
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    label: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    alternative_labels: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    misapplied_labels: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    hidden_labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    definition: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<RawTag>,
}

/// Tags are exported either as bare names or as tag objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTag {
    Name(String),
    Object { name: String },
}

impl RawTag {
    fn into_name(self) -> String {
        match self {
            RawTag::Name(name) | RawTag::Object { name } => name,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse an export document held in memory.
pub fn parse_snapshot(bytes: &[u8]) -> Result<VocabularySnapshot> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(VocabError::EmptyInput);
    }

    let document: ExportDocument = serde_json::from_slice(bytes).map_err(|e| {
        if e.is_data() {
            VocabError::snapshot(format!("invalid export document: {e}"))
        } else {
            VocabError::Json(e)
        }
    })?;

    let snapshot = convert_document(document);
    log::info!(
        "Loaded vocabulary '{}' with {} concepts",
        snapshot.vocabulary().name,
        snapshot.len()
    );
    Ok(snapshot)
}

/// Read and parse an export document from a reader.
pub fn read_snapshot<R: Read>(mut reader: R) -> Result<VocabularySnapshot> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_snapshot(&bytes)
}

/// Read and parse an export document from a file.
pub fn read_snapshot_file<P: AsRef<Path>>(path: P) -> Result<VocabularySnapshot> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        VocabError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open export '{}': {}", path.display(), e),
        ))
    })?;
    read_snapshot(file)
}

fn convert_document(document: ExportDocument) -> VocabularySnapshot {
    let metadata = ExportMetadata {
        created_date: document
            .metadata
            .and_then(|metadata| metadata.created_date)
            .and_then(|value| parse_timestamp(&value)),
    };

    let raw = document.vocabulary;
    let owner = format!("vocabulary '{}'", raw.name);
    let vocabulary = Vocabulary {
        key: raw.key,
        label: drop_displaced(convert_single(raw.label, &owner), &owner),
        definition: drop_displaced(convert_single(raw.definition, &owner), &owner),
        namespace: raw.namespace,
        name: raw.name,
    };

    let concepts = document
        .concepts
        .into_iter()
        .map(convert_concept)
        .collect();

    VocabularySnapshot::new(metadata, vocabulary, concepts)
}

fn convert_concept(raw: RawConcept) -> Concept {
    let owner = format!("concept '{}' ({})", raw.name, raw.key);
    let (label, displaced) = convert_single(raw.label, &owner);
    let mut alternative_labels = convert_multi(raw.alternative_labels, &owner);
    for (language, value) in displaced {
        log::warn!("{owner}: keeping {language} label '{value}' as an alternative label");
        alternative_labels.entry(language).or_default().push(value);
    }

    Concept {
        key: raw.key,
        parent_key: raw.parent_key,
        label,
        alternative_labels,
        misapplied_labels: convert_multi(raw.misapplied_labels, &owner),
        hidden_labels: raw.hidden_labels,
        definition: drop_displaced(convert_single(raw.definition, &owner), &owner),
        tags: raw.tags.into_iter().map(RawTag::into_name).collect(),
        name: raw.name,
    }
}

/// Map locale codes to languages, keeping one value per language.
///
/// Codes sharing a language after region folding (`en`, `en-GB`) compete for
/// one slot. The first code in code order keeps it; the other values are
/// returned as displaced so the caller decides what to do with them.
fn convert_single(
    raw: BTreeMap<String, String>,
    owner: &str,
) -> (BTreeMap<Language, String>, Vec<(Language, String)>) {
    let mut converted = BTreeMap::new();
    let mut displaced = Vec::new();
    for (code, value) in raw {
        match Language::from_locale(&code) {
            Some(language) => match converted.entry(language) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(_) => displaced.push((language, value)),
            },
            None => log::warn!("{owner}: dropping value in unsupported language '{code}'"),
        }
    }
    (converted, displaced)
}

fn drop_displaced(
    (converted, displaced): (BTreeMap<Language, String>, Vec<(Language, String)>),
    owner: &str,
) -> BTreeMap<Language, String> {
    for (language, value) in displaced {
        log::warn!("{owner}: dropping second {language} value '{value}'");
    }
    converted
}

fn convert_multi(
    raw: BTreeMap<String, Vec<String>>,
    owner: &str,
) -> BTreeMap<Language, Vec<String>> {
    let mut converted: BTreeMap<Language, Vec<String>> = BTreeMap::new();
    for (code, values) in raw {
        match Language::from_locale(&code) {
            Some(language) => converted.entry(language).or_default().extend(values),
            None => log::warn!(
                "{owner}: dropping {} values in unsupported language '{code}'",
                values.len()
            ),
        }
    }
    converted
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|date| date.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        _ => None,
    };
    if parsed.is_none() {
        log::warn!("Ignoring unreadable export createdDate {value}");
    }
    parsed
}
