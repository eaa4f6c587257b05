//! Shared helpers for field parsing, validation and limits.

pub mod validation;
