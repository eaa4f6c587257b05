//! Parsers for hash list files.
//!
//! A hash list is a delimited text file with one record per line:
//!
//! ```text
//! photo-001.jpg,12,0,255,...,37
//! photo-002.jpg,2024-01-05,camera-a,4,19,...,200
//! ```
//!
//! The first field is the record name and the last 144 fields are the hash.
//! Fields in between are ignored. Each hash field is a decimal integer
//! narrowed to a byte by keeping its low eight bits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hash_match::core::hash::HashConfig;
//! use hash_match::parsing::hash_list::parse_hash_list_file;
//! use std::path::Path;
//!
//! let parsed = parse_hash_list_file(Path::new("hashes.csv"), &HashConfig::default()).unwrap();
//! println!("{} records, {} skipped", parsed.records.len(), parsed.skipped.len());
//! ```

pub mod hash_list;
