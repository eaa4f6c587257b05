//! Parser for delimited hash list files.
//!
//! Each line holds one record: a name, any number of optional metadata
//! fields, then the hash values. A line is accepted when it has at least
//! `hash_len` fields; the name is field 0 and the hash is the *last*
//! `hash_len` fields. Lines that fail either rule are skipped and recorded,
//! never fatal.
//!
//! Files ending in `.gz` are decompressed transparently.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::hash::{HashConfig, HashVector};
use crate::core::record::HashRecord;
use crate::utils::validation::{check_record_limit, parse_hash_field, split_fields};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}

/// Why a single line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineError {
    #[error("line has {found} fields, at least {required} required")]
    TooFewFields { found: usize, required: usize },

    #[error("field {field} is not an integer: '{value}'")]
    InvalidValue { field: usize, value: String },
}

/// A rejected line and its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: LineError,
}

/// Records parsed from a hash list, in source order, plus what was skipped
#[derive(Debug, Default)]
pub struct ParsedHashList {
    pub records: Vec<HashRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse a single hash list line
///
/// # Errors
///
/// Returns `LineError::TooFewFields` if the line has fewer than
/// `config.hash_len` fields, or `LineError::InvalidValue` if one of the hash
/// fields is not an integer.
pub fn parse_line(line: &str, config: &HashConfig) -> Result<HashRecord, LineError> {
    let fields = split_fields(line, config.delimiter);
    if fields.len() < config.hash_len || fields.is_empty() {
        return Err(LineError::TooFewFields {
            found: fields.len(),
            required: config.hash_len.max(1),
        });
    }

    let start = fields.len() - config.hash_len;
    let mut values = Vec::with_capacity(config.hash_len);
    for (offset, field) in fields[start..].iter().enumerate() {
        let value = parse_hash_field(field).ok_or_else(|| LineError::InvalidValue {
            field: start + offset,
            value: (*field).to_string(),
        })?;
        values.push(value);
    }

    Ok(HashRecord::new(fields[0], HashVector::new(values)))
}

/// Parse hash list text
///
/// # Errors
///
/// Returns `ParseError::TooManyRecords` if the record limit is exceeded.
/// Malformed lines are not errors; they are collected in
/// [`ParsedHashList::skipped`].
pub fn parse_hash_list_text(text: &str, config: &HashConfig) -> Result<ParsedHashList, ParseError> {
    parse_hash_list_reader(text.as_bytes(), config)
}

/// Parse a hash list file, decompressing `.gz` files
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or read, or
/// `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn parse_hash_list_file(path: &Path, config: &HashConfig) -> Result<ParsedHashList, ParseError> {
    let file = std::fs::File::open(path)?;

    if is_gzip_path(path) {
        parse_hash_list_reader(BufReader::new(MultiGzDecoder::new(file)), config)
    } else {
        parse_hash_list_reader(BufReader::new(file), config)
    }
}

/// Parse hash list lines from any buffered reader
///
/// Lines are read as bytes so that a stray non-UTF-8 name does not abort the
/// load; invalid sequences are replaced.
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure, or `ParseError::TooManyRecords`
/// if the record limit is exceeded.
pub fn parse_hash_list_reader<R: BufRead>(
    mut reader: R,
    config: &HashConfig,
) -> Result<ParsedHashList, ParseError> {
    let mut parsed = ParsedHashList::default();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }

        match parse_line(line, config) {
            Ok(record) => {
                if check_record_limit(parsed.records.len()).is_some() {
                    return Err(ParseError::TooManyRecords(parsed.records.len()));
                }
                parsed.records.push(record);
            }
            Err(reason) => {
                debug!("Skipping line {line_number}: {reason}");
                parsed.skipped.push(SkippedLine {
                    line_number,
                    reason,
                });
            }
        }
    }

    if !parsed.skipped.is_empty() {
        warn!(
            "Skipped {} malformed line(s) out of {}",
            parsed.skipped.len(),
            parsed.skipped.len() + parsed.records.len()
        );
    }

    Ok(parsed)
}

/// Check if the path names a gzip-compressed file
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}
