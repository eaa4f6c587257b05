//! # hash-match
//!
//! A library for matching perceptual image hashes against a reference hash
//! database.
//!
//! Hashes are fixed-length vectors of 144 bytes produced by an external
//! perceptual hashing routine. Two hashes are compared by the sum of squared
//! per-byte differences; a candidate matches a reference when that distance
//! is at or below a threshold (41,943 by default).
//!
//! ## Features
//!
//! - **Hash list parsing**: delimited text, optional metadata columns, gzip support
//! - **First-match**: earliest reference within the threshold, with early exit
//! - **Best-match**: closest reference overall, ties to the earliest
//! - **Score-only**: distance to the closest reference for calibration
//! - **Reporting**: classic text lines, TSV or JSON
//! - **HTTP service**: classify hashes posted to a long-running server
//!
//! ## Example
//!
//! ```rust,no_run
//! use hash_match::{HashStore, MatchingEngine};
//! use hash_match::core::hash::HashConfig;
//! use std::path::Path;
//!
//! let config = HashConfig::default();
//! let candidates = HashStore::load_from_file(Path::new("candidates.csv"), &config).unwrap();
//! let references = HashStore::load_from_file(Path::new("reference.csv"), &config).unwrap();
//!
//! let engine = MatchingEngine::new(&references);
//! for record in &candidates {
//!     if let Some(m) = engine.find_first_match(&record.hash, u64::try_from(config.threshold).unwrap()) {
//!         println!("{} matches reference {} at {}", record.name, m.index, m.distance);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Hash record storage
//! - [`core`]: Core data types for hashes and records
//! - [`matching`]: Distance metric and matching strategies
//! - [`parsing`]: Hash list parsing
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP matching service

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::HashStore;
pub use core::hash::{HashConfig, HashVector, DEFAULT_THRESHOLD, HASH_SIZE};
pub use core::record::HashRecord;
pub use core::types::MatchMode;
pub use matching::distance::distance;
pub use matching::engine::{CandidateResult, Decision, Match, MatchingConfig, MatchingEngine};
