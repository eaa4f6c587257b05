use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

use crate::core::hash::HashConfig;
use crate::core::record::HashRecord;
use crate::parsing::hash_list::{self, ParseError, SkippedLine};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Hash list not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read hash list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Record {index} has {found} hash values, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// An ordered, read-only collection of hash records.
///
/// Record order equals source line order: the first valid line is index 0.
/// Matching reports records by index, and best-match ties resolve to the
/// lowest index, so the order is part of the contract.
#[derive(Debug, Clone, Default)]
pub struct HashStore {
    records: Vec<HashRecord>,
    hash_len: usize,
    skipped: Vec<SkippedLine>,
}

impl HashStore {
    /// Create an empty store for hashes of `hash_len` values
    pub fn empty(hash_len: usize) -> Self {
        Self {
            records: Vec::new(),
            hash_len,
            skipped: Vec::new(),
        }
    }

    /// Build a store from already-constructed records
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LengthMismatch` if any record's hash does not
    /// have exactly `hash_len` values.
    pub fn from_records(records: Vec<HashRecord>, hash_len: usize) -> Result<Self, StoreError> {
        if let Some((index, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.hash.len() != hash_len)
        {
            return Err(StoreError::LengthMismatch {
                index,
                expected: hash_len,
                found: record.hash.len(),
            });
        }

        Ok(Self {
            records,
            hash_len,
            skipped: Vec::new(),
        })
    }

    /// Load a store from hash list text
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` if the record limit is exceeded.
    pub fn from_text(text: &str, config: &HashConfig) -> Result<Self, StoreError> {
        let parsed = hash_list::parse_hash_list_text(text, config).map_err(|source| {
            StoreError::Read {
                path: PathBuf::from("<text>"),
                source,
            }
        })?;

        Ok(Self {
            records: parsed.records,
            hash_len: config.hash_len,
            skipped: parsed.skipped,
        })
    }

    /// Load a store from a hash list file (plain or `.gz`)
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the file does not exist, or
    /// `StoreError::Read` if it cannot be read.
    pub fn load_from_file(path: &Path, config: &HashConfig) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let parsed =
            hash_list::parse_hash_list_file(path, config).map_err(|source| StoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            records: parsed.records,
            hash_len: config.hash_len,
            skipped: parsed.skipped,
        })
    }

    /// Load a store, degrading to an empty store if the file cannot be read.
    ///
    /// The failure is logged and processing continues with zero records.
    /// `label` names the role of the store in log messages.
    pub fn load_or_empty(path: &Path, config: &HashConfig, label: &str) -> Self {
        match Self::load_from_file(path, config) {
            Ok(store) => {
                debug!("{label}: {} hashes loaded from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                error!("{e}");
                Self::empty(config.hash_len)
            }
        }
    }

    /// Get a record by index
    pub fn get(&self, index: usize) -> Option<&HashRecord> {
        self.records.get(index)
    }

    /// All records in source order
    pub fn records(&self) -> &[HashRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HashRecord> {
        self.records.iter()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Length of every hash in this store
    pub fn hash_len(&self) -> usize {
        self.hash_len
    }

    /// Lines rejected while loading
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Serialize back to hash list text, one record per line
    pub fn to_text(&self, delimiter: char) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_line(delimiter));
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a HashStore {
    type Item = &'a HashRecord;
    type IntoIter = std::slice::Iter<'a, HashRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
