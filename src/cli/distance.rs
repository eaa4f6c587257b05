//! Distance command - compare two individual hash records.
//!
//! Each input is a hash list; by default the first record of each is used.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::store::HashStore;
use crate::cli::{HashOptions, OutputFormat};
use crate::core::hash::DEFAULT_THRESHOLD;
use crate::core::record::HashRecord;
use crate::matching::distance::distance;

#[derive(Args)]
pub struct DistanceArgs {
    /// Hash list holding the first record
    #[arg(required = true)]
    pub input_a: PathBuf,

    /// Hash list holding the second record
    #[arg(required = true)]
    pub input_b: PathBuf,

    /// Record index within the first hash list
    #[arg(long, default_value = "0")]
    pub index_a: usize,

    /// Record index within the second hash list
    #[arg(long, default_value = "0")]
    pub index_b: usize,

    /// Threshold used to report whether the records match
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i64,

    #[command(flatten)]
    pub hash: HashOptions,
}

/// Execute the distance command
///
/// # Errors
///
/// Returns an error if either hash list cannot be read or the requested
/// record index does not exist.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: DistanceArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.hash.config(args.threshold);

    let store_a = HashStore::load_from_file(&args.input_a, &config)?;
    let store_b = HashStore::load_from_file(&args.input_b, &config)?;

    if verbose {
        eprintln!(
            "Input A: {} records, Input B: {} records",
            store_a.len(),
            store_b.len()
        );
    }

    let record_a = select(&store_a, args.index_a)
        .with_context(|| format!("Reading {}", args.input_a.display()))?;
    let record_b = select(&store_b, args.index_b)
        .with_context(|| format!("Reading {}", args.input_b.display()))?;

    let d = distance(&record_a.hash, &record_b.hash);
    let is_match = i64::try_from(d).is_ok_and(|d| d <= args.threshold);

    match format {
        OutputFormat::Text => {
            println!(
                "Distance between hashes {} and {}: {d}",
                record_a.name, record_b.name
            );
            println!(
                "{} (threshold {})",
                if is_match { "Match" } else { "No match" },
                args.threshold
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "a": { "name": record_a.name, "index": args.index_a },
                "b": { "name": record_b.name, "index": args.index_b },
                "distance": d,
                "threshold": args.threshold,
                "match": is_match,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("a\tb\tdistance\tmatch");
            println!("{}\t{}\t{d}\t{is_match}", record_a.name, record_b.name);
        }
    }

    Ok(())
}

fn select(store: &HashStore, index: usize) -> anyhow::Result<&HashRecord> {
    store.get(index).ok_or_else(|| {
        anyhow::anyhow!(
            "Record {index} not found ({} valid records)",
            store.len()
        )
    })
}
