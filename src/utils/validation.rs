//! Centralized validation and helper functions.

/// Maximum number of records allowed in a single hash list (DOS protection)
pub const MAX_RECORDS: usize = 10_000_000;

/// Parse one hash field and narrow it to a byte.
///
/// The field must be a decimal integer (optionally signed) that fits in 32
/// bits. Values outside `0..=255` are not rejected: they keep only their low
/// eight bits, so `300` becomes `44` and `-1` becomes `255`.
///
/// # Examples
///
/// ```
/// use hash_match::utils::validation::parse_hash_field;
///
/// assert_eq!(parse_hash_field("17"), Some(17));
/// assert_eq!(parse_hash_field("300"), Some(44));
/// assert_eq!(parse_hash_field("-1"), Some(255));
/// assert_eq!(parse_hash_field("x"), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_hash_field(field: &str) -> Option<u8> {
    field.parse::<i32>().ok().map(|value| value as u8)
}

/// Split a line into fields, dropping trailing empty fields.
///
/// `"a,1,2,,"` yields `["a", "1", "2"]`, so trailing delimiters never count
/// towards the minimum field rule.
pub fn split_fields(line: &str, delimiter: char) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(delimiter).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Hash payload validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Hash has {found} values, expected {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("Hash value at position {0} is not an integer")]
    InvalidValue(usize),
    #[error("Empty hash provided")]
    EmptyHash,
}

/// Parse a delimited hash string (values only, no name) into bytes.
///
/// Unlike hash list loading this is strict: the value count must equal
/// `expected` and every value must parse.
///
/// # Errors
///
/// Returns `ValidationError::EmptyHash` for blank input,
/// `ValidationError::InvalidValue` for a non-numeric field, or
/// `ValidationError::WrongLength` if the count is wrong.
pub fn parse_hash_values(
    text: &str,
    delimiter: char,
    expected: usize,
) -> Result<Vec<u8>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyHash);
    }

    let fields = split_fields(text, delimiter);
    let mut values = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        values.push(parse_hash_field(field.trim()).ok_or(ValidationError::InvalidValue(i))?);
    }

    if values.len() != expected {
        return Err(ValidationError::WrongLength {
            expected,
            found: values.len(),
        });
    }

    Ok(values)
}
