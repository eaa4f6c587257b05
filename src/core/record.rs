use serde::{Deserialize, Serialize};

use crate::core::hash::HashVector;

/// A named hash, one per line of a hash list.
///
/// Names are not required to be unique; records are addressed by position
/// within their [`HashStore`](crate::catalog::store::HashStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Display name (first field of the source line)
    pub name: String,

    /// The hash itself (last fields of the source line)
    pub hash: HashVector,
}

impl HashRecord {
    pub fn new(name: impl Into<String>, hash: HashVector) -> Self {
        Self {
            name: name.into(),
            hash,
        }
    }

    /// Serialize as a hash list line: the name followed by every hash value
    pub fn to_line(&self, delimiter: char) -> String {
        format!(
            "{}{}{}",
            self.name,
            delimiter,
            self.hash.to_fields(delimiter)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_line() {
        let record = HashRecord::new("cat.jpg", HashVector::new(vec![1u8, 2, 3]));
        assert_eq!(record.to_line(','), "cat.jpg,1,2,3");
    }
}
