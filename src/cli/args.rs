//! Command line argument parsing for the vocab-lookup CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::prefilter::PrefilterKind;
use crate::lookup::engine::SnapshotSource;
use crate::vocabulary::language::Language;

/// vocab-lookup - resolve free-text values to vocabulary concepts
#[derive(Parser, Debug, Clone)]
#[command(name = "vocab-lookup")]
#[command(about = "Resolve free-text values to the concepts of a controlled vocabulary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct VocabLookupArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl VocabLookupArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve values against a vocabulary
    Lookup(LookupArgs),

    /// Show index statistics of a vocabulary
    Stats(StatsArgs),
}

/// Where the vocabulary comes from and how its values are analyzed.
#[derive(Args, Debug, Clone)]
pub struct VocabularyArgs {
    /// Vocabulary export file, or the vocabulary name when --api-url is given
    #[arg(value_name = "EXPORT")]
    pub export: String,

    /// Registry API to download the latest release of EXPORT from
    #[cfg(feature = "remote")]
    #[arg(long, value_name = "URL", env = "VOCAB_LOOKUP_API_URL")]
    pub api_url: Option<String>,

    /// Prefilter applied to labels and values, in the given order
    #[arg(short, long = "prefilter", value_name = "KIND")]
    pub prefilters: Vec<PrefilterKind>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl VocabularyArgs {
    /// The snapshot source these arguments select.
    pub fn snapshot_source(&self) -> SnapshotSource {
        #[cfg(feature = "remote")]
        {
            if let Some(api_url) = &self.api_url {
                return SnapshotSource::Remote {
                    api_url: api_url.clone(),
                    vocabulary_name: self.export.clone(),
                };
            }
        }
        SnapshotSource::Path(PathBuf::from(&self.export))
    }
}

/// Arguments for resolving values
#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    #[command(flatten)]
    pub vocabulary: VocabularyArgs,

    /// Values to resolve
    #[arg(value_name = "VALUES")]
    pub values: Vec<String>,

    /// File with one value per line
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Language the values are written in (e.g. "es", "pt-BR")
    #[arg(short, long = "lang", value_name = "CODE")]
    pub language: Option<Language>,
}

/// Arguments for showing statistics
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub vocabulary: VocabularyArgs,

    /// List the label values shared by several concepts
    #[arg(short, long)]
    pub ambiguous: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_lookup_command() {
        let args = VocabLookupArgs::try_parse_from([
            "vocab-lookup",
            "lookup",
            "life_stage.json",
            "1 adult(s)",
            "subimago",
            "--lang",
            "es",
            "--prefilter",
            "remove-parenthesis-suffix",
            "-p",
            "remove-numeric-prefix",
        ])
        .unwrap();

        if let Command::Lookup(lookup_args) = args.command {
            assert_eq!(lookup_args.vocabulary.export, "life_stage.json");
            assert_eq!(lookup_args.values, vec!["1 adult(s)", "subimago"]);
            assert_eq!(lookup_args.language, Some(Language::Spanish));
            assert_eq!(
                lookup_args.vocabulary.prefilters,
                vec![
                    PrefilterKind::RemoveParenthesisSuffix,
                    PrefilterKind::RemoveNumericPrefix
                ]
            );
            assert!(lookup_args.input.is_none());
            assert!(matches!(
                lookup_args.vocabulary.snapshot_source(),
                SnapshotSource::Path(path) if path == PathBuf::from("life_stage.json")
            ));
        } else {
            panic!("Expected Lookup command");
        }
    }

    #[test]
    fn test_lookup_from_input_file() {
        let args = VocabLookupArgs::try_parse_from([
            "vocab-lookup",
            "lookup",
            "life_stage.json",
            "--input",
            "values.txt",
            "--config",
            "lookup.json",
        ])
        .unwrap();

        if let Command::Lookup(lookup_args) = args.command {
            assert!(lookup_args.values.is_empty());
            assert_eq!(lookup_args.input, Some(PathBuf::from("values.txt")));
            assert_eq!(
                lookup_args.vocabulary.config,
                Some(PathBuf::from("lookup.json"))
            );
        } else {
            panic!("Expected Lookup command");
        }
    }

    #[test]
    fn test_stats_command() {
        let args = VocabLookupArgs::try_parse_from([
            "vocab-lookup",
            "--format",
            "json",
            "--pretty",
            "stats",
            "life_stage.json",
            "--ambiguous",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
        if let Command::Stats(stats_args) = args.command {
            assert!(stats_args.ambiguous);
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(VocabLookupArgs::try_parse_from(["vocab-lookup", "lookup"]).is_err());
        assert!(
            VocabLookupArgs::try_parse_from([
                "vocab-lookup",
                "lookup",
                "export.json",
                "--lang",
                "klingon"
            ])
            .is_err()
        );
        assert!(
            VocabLookupArgs::try_parse_from([
                "vocab-lookup",
                "lookup",
                "export.json",
                "--prefilter",
                "remove-everything"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_verbosity_levels() {
        let args = VocabLookupArgs::try_parse_from(["vocab-lookup", "stats", "x.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args =
            VocabLookupArgs::try_parse_from(["vocab-lookup", "-vv", "stats", "x.json"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args =
            VocabLookupArgs::try_parse_from(["vocab-lookup", "-q", "-v", "stats", "x.json"])
                .unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
