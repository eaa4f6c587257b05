//! Command-line interface for hash-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **match**: Match candidate hashes against a reference hash database
//! - **distance**: Print the distance between two hash records
//! - **serve**: Start an HTTP matching service over a reference database
//!
//! ## Usage
//!
//! ```text
//! # Report candidates within the default threshold (first match wins)
//! hash-match match candidates.csv reference.csv
//!
//! # Custom threshold, closest reference instead of the first
//! hash-match match candidates.csv reference.csv 30000 best
//!
//! # Distance to the closest reference for every candidate
//! hash-match match candidates.csv reference.csv 0 test
//!
//! # JSON output for scripting
//! hash-match --format json match candidates.csv reference.csv
//!
//! # HTTP service
//! hash-match serve --references reference.csv --port 8080
//! ```

use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};

use crate::core::hash::{HashConfig, DEFAULT_DELIMITER, HASH_SIZE};

pub mod distance;
pub mod match_hashes;
pub mod report;

#[derive(Parser)]
#[command(name = "hash-match")]
#[command(version)]
#[command(about = "Match perceptual image hashes against a reference hash database")]
#[command(
    long_about = "hash-match compares candidate perceptual image hashes against a reference hash database.\n\nDistances are sums of squared per-byte differences. A candidate matches a reference when the distance is at or below the threshold:\n- first-match (default): report the first reference within the threshold\n- best-match: report the closest reference if it is within the threshold\n- score-only: report the distance to the closest reference for every candidate"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match candidate hashes against a reference hash database
    Match(match_hashes::MatchArgs),

    /// Print the distance between two hash records
    Distance(distance::DistanceArgs),

    /// Start the HTTP matching service
    Serve(ServeArgs),
}

/// Hash list layout options shared by every command
#[derive(clap::Args, Clone, Copy, Debug)]
pub struct HashOptions {
    /// Number of values in each hash
    #[arg(long, default_value_t = HASH_SIZE, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub hash_len: usize,

    /// Field delimiter in hash list files
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,
}

impl HashOptions {
    /// Build a hash configuration with the given threshold
    pub fn config(&self, threshold: i64) -> HashConfig {
        HashConfig {
            hash_len: self.hash_len,
            threshold,
            delimiter: self.delimiter,
        }
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Reference hash list to match against
    #[arg(short, long)]
    pub references: std::path::PathBuf,

    /// Default match threshold for requests that do not set one
    #[arg(short, long, default_value_t = crate::core::hash::DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i64,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub hash: HashOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
