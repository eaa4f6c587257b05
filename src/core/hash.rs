use serde::{Deserialize, Serialize};

/// Number of bytes in a perceptual image hash
pub const HASH_SIZE: usize = 144;

/// Default match threshold (maximum squared distance counted as a match).
///
/// Thresholds are signed: a negative threshold is valid and admits no match.
pub const DEFAULT_THRESHOLD: i64 = 41_943;

/// Field delimiter used by hash list files
pub const DEFAULT_DELIMITER: char = ',';

/// Settings shared by parsing and matching.
///
/// The hash length and threshold are carried here rather than read from the
/// constants directly so that callers (and tests) can work with shorter
/// vectors or a different operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    /// Number of values in every hash vector
    pub hash_len: usize,
    /// Maximum distance at which two hashes are considered a match
    pub threshold: i64,
    /// Field delimiter for hash list lines
    pub delimiter: char,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            hash_len: HASH_SIZE,
            threshold: DEFAULT_THRESHOLD,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl HashConfig {
    #[must_use]
    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_hash_len(mut self, hash_len: usize) -> Self {
        self.hash_len = hash_len;
        self
    }
}

/// A fixed-length perceptual hash. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashVector(Box<[u8]>);

impl HashVector {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Build a vector, checking it has exactly `expected` values
    pub fn with_len(bytes: impl Into<Box<[u8]>>, expected: usize) -> Option<Self> {
        let bytes = bytes.into();
        (bytes.len() == expected).then_some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as delimited decimal fields, e.g. `12,0,255,...`
    pub fn to_fields(&self, delimiter: char) -> String {
        let mut out = String::with_capacity(self.0.len() * 4);
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(delimiter);
            }
            out.push_str(&value.to_string());
        }
        out
    }
}

impl AsRef<[u8]> for HashVector {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HashConfig::default();
        assert_eq!(config.hash_len, 144);
        assert_eq!(config.threshold, 41_943);
        assert_eq!(config.delimiter, ',');
    }

    #[test]
    fn test_with_len_rejects_wrong_length() {
        assert!(HashVector::with_len(vec![0u8; 143], HASH_SIZE).is_none());
        assert!(HashVector::with_len(vec![0u8; 145], HASH_SIZE).is_none());
        assert_eq!(
            HashVector::with_len(vec![7u8; HASH_SIZE], HASH_SIZE).map(|h| h.len()),
            Some(HASH_SIZE)
        );
    }

    #[test]
    fn test_to_fields() {
        let hash = HashVector::new(vec![0u8, 17, 255]);
        assert_eq!(hash.to_fields(','), "0,17,255");
        assert_eq!(hash.to_fields('\t'), "0\t17\t255");
    }
}
