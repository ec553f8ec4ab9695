//! Output formatting for CLI commands.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{OutputFormat, VocabLookupArgs};
use crate::error::Result;
use crate::lookup::engine::AmbiguousLabel;
use crate::lookup::index::IndexStats;
use crate::lookup::resolver::MatchKind;
use crate::lookup::result::LookupResult;

/// Results that know how to print themselves for a human reader.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// A concept a value resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedConcept {
    pub key: i64,
    pub name: String,
    pub ancestors: Vec<String>,
    pub tags: Vec<String>,
    pub matched_by: MatchKind,
}

impl From<&LookupResult<'_>> for MatchedConcept {
    fn from(result: &LookupResult<'_>) -> Self {
        MatchedConcept {
            key: result.key(),
            name: result.name().to_string(),
            ancestors: result
                .ancestor_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            tags: result.tags().to_vec(),
            matched_by: result.matched_by(),
        }
    }
}

/// Outcome of resolving one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMatch {
    pub value: String,
    pub concept: Option<MatchedConcept>,
}

/// Result structure for lookup operations.
#[derive(Debug, Serialize)]
pub struct LookupReport {
    pub vocabulary: String,
    pub values: usize,
    pub matched: usize,
    pub duration_ms: u64,
    pub matches: Vec<ValueMatch>,
}

impl LookupReport {
    pub fn new(vocabulary: String, matches: Vec<ValueMatch>, duration_ms: u64) -> Self {
        LookupReport {
            vocabulary,
            values: matches.len(),
            matched: matches.iter().filter(|m| m.concept.is_some()).count(),
            duration_ms,
            matches,
        }
    }
}

impl HumanOutput for LookupReport {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        for value_match in &self.matches {
            match &value_match.concept {
                Some(concept) => {
                    writeln!(
                        out,
                        "{} -> {} ({}) [{}]",
                        value_match.value,
                        concept.name,
                        concept.key,
                        match_kind_label(concept.matched_by)
                    )?;
                    if !concept.ancestors.is_empty() {
                        writeln!(out, "    ancestors: {}", concept.ancestors.join(" > "))?;
                    }
                    if !concept.tags.is_empty() {
                        writeln!(out, "    tags: {}", concept.tags.join(", "))?;
                    }
                }
                None => writeln!(out, "{} -> no match", value_match.value)?,
            }
        }
        Ok(())
    }
}

/// Shared label value and the names of the concepts using it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousLabelEntry {
    pub value: String,
    pub concepts: Vec<String>,
}

impl From<&AmbiguousLabel<'_>> for AmbiguousLabelEntry {
    fn from(label: &AmbiguousLabel<'_>) -> Self {
        AmbiguousLabelEntry {
            value: label.value.to_string(),
            concepts: label
                .concepts
                .iter()
                .map(|concept| concept.name.clone())
                .collect(),
        }
    }
}

/// Vocabulary statistics.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub vocabulary: String,
    pub created_date: Option<DateTime<Utc>>,
    pub stats: IndexStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambiguous_labels: Option<Vec<AmbiguousLabelEntry>>,
}

impl HumanOutput for StatsReport {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Vocabulary: {}", self.vocabulary)?;
        if let Some(created) = self.created_date {
            writeln!(out, "Exported: {}", created.to_rfc3339())?;
        }
        writeln!(out)?;

        let stats = &self.stats;
        let rows = [
            ("Concepts", stats.concepts),
            ("Names", stats.names),
            ("Label values", stats.label_values),
            ("Ambiguous label values", stats.ambiguous_label_values),
            ("Hidden labels", stats.hidden_labels),
            ("Duplicate keys", stats.duplicate_keys),
            ("Name collisions", stats.name_collisions),
            ("Hidden label collisions", stats.hidden_label_collisions),
            ("Skipped empty values", stats.skipped_empty_values),
        ];
        for (label, count) in rows {
            writeln!(out, "{label:<24} {count}")?;
        }

        if let Some(ambiguous) = &self.ambiguous_labels {
            writeln!(out)?;
            writeln!(out, "Ambiguous labels:")?;
            for entry in ambiguous {
                writeln!(out, "  {}: {}", entry.value, entry.concepts.join(", "))?;
            }
        }
        Ok(())
    }
}

fn match_kind_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Name => "name",
        MatchKind::Label => "label",
        MatchKind::HiddenLabel => "hidden label",
    }
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &VocabLookupArgs,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(&mut out)?;
        }
        OutputFormat::Json => write_json(result, args.pretty, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(result: &T, pretty: bool, out: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<T: HumanOutput>(result: &T) -> String {
        let mut buffer = Vec::new();
        result.write_human(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn report() -> LookupReport {
        LookupReport::new(
            "LifeStage".to_string(),
            vec![
                ValueMatch {
                    value: "subimago".to_string(),
                    concept: Some(MatchedConcept {
                        key: 2,
                        name: "Imago".to_string(),
                        ancestors: vec!["Adult".to_string(), "Stage".to_string()],
                        tags: vec!["insect".to_string()],
                        matched_by: MatchKind::HiddenLabel,
                    }),
                },
                ValueMatch {
                    value: "blob".to_string(),
                    concept: None,
                },
            ],
            3,
        )
    }

    #[test]
    fn test_lookup_report_counts() {
        let report = report();
        assert_eq!(report.values, 2);
        assert_eq!(report.matched, 1);
    }

    #[test]
    fn test_lookup_report_human() {
        let text = render(&report());
        assert_eq!(
            text,
            "subimago -> Imago (2) [hidden label]\n    ancestors: Adult > Stage\n    tags: insect\nblob -> no match\n"
        );
    }

    #[test]
    fn test_lookup_report_json() {
        let mut buffer = Vec::new();
        write_json(&report(), false, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["matched"], 1);
        assert_eq!(value["matches"][0]["concept"]["matched_by"], "hidden_label");
        assert_eq!(value["matches"][0]["concept"]["ancestors"][0], "Adult");
        assert!(value["matches"][1]["concept"].is_null());
    }

    #[test]
    fn test_stats_report_human() {
        let report = StatsReport {
            vocabulary: "LifeStage".to_string(),
            created_date: None,
            stats: IndexStats {
                concepts: 4,
                ambiguous_label_values: 1,
                ..IndexStats::default()
            },
            ambiguous_labels: Some(vec![AmbiguousLabelEntry {
                value: "joven".to_string(),
                concepts: vec!["Juvenile".to_string(), "Young".to_string()],
            }]),
        };
        let text = render(&report);
        assert!(text.starts_with("Vocabulary: LifeStage\n"));
        assert!(text.contains("Concepts                 4\n"));
        assert!(text.contains("  joven: Juvenile, Young\n"));
    }
}
