//! Core data types for hash matching.
//!
//! - [`HashVector`](hash::HashVector): a fixed-length perceptual hash of unsigned bytes
//! - [`HashConfig`](hash::HashConfig): hash length, threshold and delimiter settings
//! - [`HashRecord`](record::HashRecord): a named hash, one line of a hash list
//! - [`MatchMode`](types::MatchMode): first-match, best-match or score-only classification
//!
//! ## Hash List Lines
//!
//! Hash lists hold one record per line:
//!
//! ```text
//! <name>,<optional>,...,<optional>,<v0>,<v1>,...,<v143>
//! ```
//!
//! The name is the first field and the hash is always the *last* 144 fields,
//! so any number of metadata fields may sit in between.

pub mod hash;
pub mod record;
pub mod types;
