//! Input validation helpers
//!
//! Request DTOs are checked before they leave the client so that a missing
//! name or a negative price is reported without a round trip.

use thiserror::Error;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and invoice notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, barcodes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// A request field failed local validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{field} must not be empty")));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(ValidationError::new(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate a monetary amount: finite and non-negative.
pub fn validate_amount(value: f64, field: &str) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(ValidationError::new(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate a stock quantity: non-negative.
pub fn validate_stock(value: i64, field: &str) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
