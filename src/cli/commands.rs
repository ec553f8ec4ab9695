//! Command implementations for the vocab-lookup CLI.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;

use rayon::prelude::*;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, VocabError};
use crate::lookup::config::LookupConfig;
use crate::lookup::engine::VocabularyLookup;

/// Execute a CLI command.
pub fn execute_command(args: VocabLookupArgs) -> Result<()> {
    match &args.command {
        Command::Lookup(lookup_args) => lookup_values(lookup_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Build the lookup engine the vocabulary arguments describe.
///
/// Prefilters from the configuration file run before those given on the
/// command line.
pub fn open_vocabulary(args: &VocabularyArgs) -> Result<VocabularyLookup> {
    let config = match &args.config {
        Some(path) => LookupConfig::from_file(path)?,
        None => LookupConfig::default(),
    };
    let mut builder = VocabularyLookup::builder()
        .source(args.snapshot_source())
        .with_config(&config);
    for kind in &args.prefilters {
        builder = builder.with_prefilter(kind.build());
    }
    builder.build()
}

/// Resolve values.
fn lookup_values(args: &LookupArgs, cli_args: &VocabLookupArgs) -> Result<()> {
    let values = collect_values(args)?;
    if values.is_empty() {
        return Err(VocabError::invalid_config(
            "no values given; pass VALUES or --input FILE",
        ));
    }

    let lookup = open_vocabulary(&args.vocabulary)?;
    let vocabulary = lookup
        .vocabulary()
        .map(|vocabulary| vocabulary.name.clone())
        .unwrap_or_default();
    log::info!(
        "Resolving {} values against '{}' ({} concepts)",
        values.len(),
        vocabulary,
        lookup.len()
    );

    let start_time = Instant::now();
    let matches = resolve_all(&lookup, values, args);
    let duration_ms = start_time.elapsed().as_millis() as u64;

    let report = LookupReport::new(vocabulary, matches, duration_ms);
    output_result("Lookup results", &report, cli_args)
}

/// Resolve every value in parallel, keeping input order.
pub fn resolve_all(
    lookup: &VocabularyLookup,
    values: Vec<String>,
    args: &LookupArgs,
) -> Vec<ValueMatch> {
    values
        .into_par_iter()
        .map(|value| {
            let concept = lookup
                .lookup(&value, args.language)
                .as_ref()
                .map(MatchedConcept::from);
            ValueMatch { value, concept }
        })
        .collect()
}

/// Values from the command line followed by the non-blank lines of `--input`.
fn collect_values(args: &LookupArgs) -> Result<Vec<String>> {
    let mut values = args.values.clone();
    if let Some(path) = &args.input {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                values.push(line);
            }
        }
    }
    Ok(values)
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, cli_args: &VocabLookupArgs) -> Result<()> {
    let lookup = open_vocabulary(&args.vocabulary)?;

    let report = StatsReport {
        vocabulary: lookup
            .vocabulary()
            .map(|vocabulary| vocabulary.name.clone())
            .unwrap_or_default(),
        created_date: lookup.metadata().and_then(|metadata| metadata.created_date),
        stats: lookup.stats(),
        ambiguous_labels: args.ambiguous.then(|| {
            lookup
                .ambiguous_labels()
                .iter()
                .map(AmbiguousLabelEntry::from)
                .collect()
        }),
    };

    output_result("Vocabulary statistics", &report, cli_args)
}
