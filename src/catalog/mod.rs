//! Hash record storage.
//!
//! A [`HashStore`](store::HashStore) is built once per input file, one for the
//! candidate hashes and one for the reference database, and is read-only for
//! the rest of the run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hash_match::HashStore;
//! use hash_match::core::hash::HashConfig;
//! use std::path::Path;
//!
//! let config = HashConfig::default();
//! let references = HashStore::load_from_file(Path::new("reference.csv"), &config).unwrap();
//!
//! for (index, record) in references.iter().enumerate() {
//!     println!("{index}: {}", record.name);
//! }
//! ```

pub mod store;
