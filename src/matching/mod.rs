//! Hash matching: the distance metric and the three classification strategies.
//!
//! - [`distance`](distance::distance): sum of squared per-byte differences
//! - [`MatchingEngine`](engine::MatchingEngine): classifies candidates against a reference store
//!
//! ## Strategies
//!
//! 1. **First-match** (default): scan references in order and stop at the first
//!    one within the threshold. Each record's sum is abandoned as soon as it
//!    passes the threshold, so non-matching records are cheap.
//! 2. **Best-match**: compute every distance and keep the smallest (earliest
//!    index on ties), then apply the threshold.
//! 3. **Score-only**: as best-match, but the distance is reported
//!    unconditionally. Useful for choosing a threshold.
//!
//! The search is deliberately exhaustive and linear; there is no index.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hash_match::{HashStore, MatchingEngine, MatchingConfig, MatchMode};
//! use hash_match::core::hash::HashConfig;
//! use std::path::Path;
//!
//! let config = HashConfig::default();
//! let candidates = HashStore::load_from_file(Path::new("candidates.csv"), &config).unwrap();
//! let references = HashStore::load_from_file(Path::new("reference.csv"), &config).unwrap();
//!
//! let engine = MatchingEngine::with_config(
//!     &references,
//!     MatchingConfig { mode: MatchMode::Best, ..MatchingConfig::default() },
//! );
//!
//! for result in engine.classify_all(&candidates) {
//!     if let Some(m) = result.decision.matched() {
//!         println!("{} -> {} ({})", result.name, references.records()[m.index].name, m.distance);
//!     }
//! }
//! ```

pub mod distance;
pub mod engine;
