//! Match command - classify every candidate hash against a reference database.
//!
//! Arguments follow the long-standing positional form:
//!
//! ```text
//! hash-match match <candidates> <references> [threshold] [mode]
//! ```
//!
//! An unparseable threshold silently falls back to the default. Only the
//! first character of the mode is read: `b` selects best-match and `t`
//! selects score-only.

use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use crate::catalog::store::HashStore;
use crate::cli::report::Reporter;
use crate::cli::{HashOptions, OutputFormat};
use crate::core::hash::DEFAULT_THRESHOLD;
use crate::core::types::MatchMode;
use crate::matching::engine::{MatchingConfig, MatchingEngine};

#[derive(Args)]
pub struct MatchArgs {
    /// Hash list of candidates to classify
    #[arg(required = true)]
    pub candidates: PathBuf,

    /// Hash list of reference hashes to match against
    #[arg(required = true)]
    pub references: PathBuf,

    /// Maximum distance counted as a match (default 41943)
    #[arg(allow_hyphen_values = true)]
    pub threshold: Option<String>,

    /// Mode selector: 'b...' for best-match, 't...' for score-only
    pub mode: Option<String>,

    /// Report the closest reference instead of the first within the threshold
    #[arg(long, conflicts_with = "score")]
    pub best: bool,

    /// Report the distance to the closest reference for every candidate
    #[arg(long)]
    pub score: bool,

    /// Classify candidates in parallel
    #[arg(long)]
    pub parallel: bool,

    #[command(flatten)]
    pub hash: HashOptions,
}

impl MatchArgs {
    /// Resolve the matching mode from flags and the positional selector.
    ///
    /// Flags take precedence over the positional selector.
    pub fn resolve_mode(&self) -> MatchMode {
        if self.score {
            MatchMode::Score
        } else if self.best {
            MatchMode::Best
        } else {
            self.mode
                .as_deref()
                .map_or(MatchMode::First, MatchMode::from_selector)
        }
    }
}

/// Parse a threshold argument as a 32-bit integer, falling back to the
/// default when it is missing or does not parse.
///
/// Negative values are kept; they admit no match.
pub fn resolve_threshold(raw: Option<&str>) -> i64 {
    match raw {
        None => DEFAULT_THRESHOLD,
        Some(text) => text.parse::<i32>().map_or_else(
            |_| {
                debug!("Ignoring invalid threshold '{text}'; using {DEFAULT_THRESHOLD}");
                DEFAULT_THRESHOLD
            },
            i64::from,
        ),
    }
}

/// Execute the match command
///
/// # Errors
///
/// Returns an error only if writing the report fails. Unreadable inputs are
/// logged and treated as empty.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let threshold = resolve_threshold(args.threshold.as_deref());
    let mode = args.resolve_mode();
    let config = args.hash.config(threshold);

    let candidates = HashStore::load_or_empty(&args.candidates, &config, "Candidates");
    info!("Candidate hashes to match: {}", candidates.len());
    let references = HashStore::load_or_empty(&args.references, &config, "References");
    info!("Reference hashes in database: {}", references.len());

    if mode.uses_threshold() {
        info!(
            "Candidate hashes with a distance less than {threshold} to a reference hash will be displayed"
        );
    }
    if verbose {
        debug!(
            "Mode: {mode}, hash length: {}, skipped lines: {} candidate / {} reference",
            config.hash_len,
            candidates.skipped().len(),
            references.skipped().len()
        );
    }

    let engine = MatchingEngine::with_config(
        &references,
        MatchingConfig {
            mode,
            threshold,
            parallel: args.parallel,
        },
    );
    let results = engine.classify_all(&candidates);

    let reporter = Reporter::new(
        engine.references(),
        format,
        engine.config().mode,
        engine.config().threshold,
    );
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    reporter.write(&mut out, &results)?;

    Ok(())
}
