//! Input validation helpers
//!
//! Text length limits and field checks shared by the services.
//! SQLite TEXT has no built-in length enforcement.

use super::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Names: customers, menu items, categories, contacts
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, contact messages
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, location id, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Contact messages can be longer than notes
pub const MAX_MESSAGE_LEN: usize = 2000;

// ── Validation helpers ──────────────────────────────────────────────

fn check_length(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let chars = value.chars().count();
    if chars > max_len {
        return Err(AppError::out_of_range(
            field,
            format!("{field} is too long ({chars} chars, max {max_len})"),
        ));
    }
    Ok(())
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    check_length(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    match value {
        Some(v) => check_length(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a strictly positive integer field.
pub fn validate_positive(value: i64, field: &str) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::out_of_range(field, format!("{field} must be positive")));
    }
    Ok(())
}

/// Validate a non-negative integer field.
pub fn validate_non_negative(value: i64, field: &str) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::out_of_range(field, format!("{field} must not be negative")));
    }
    Ok(())
}

/// Validate a `YYYY-MM-DD` date.
pub fn validate_date(value: &str, field: &str) -> AppResult<()> {
    if !shared::util::is_valid_date(value) {
        return Err(AppError::invalid_field(
            field,
            format!("{field} must be a YYYY-MM-DD date"),
        ));
    }
    Ok(())
}

/// Validate a `HH:MM` time of day.
pub fn validate_time(value: &str, field: &str) -> AppResult<()> {
    if !shared::util::is_valid_time(value) {
        return Err(AppError::invalid_field(field, format!("{field} must be a HH:MM time")));
    }
    Ok(())
}
