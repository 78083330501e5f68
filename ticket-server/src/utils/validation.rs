//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Lengths are counted in characters, not bytes, since most free text is
//! entered in Hebrew.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Command and unit names
pub const MAX_NAME_LEN: usize = 200;

/// Ticket descriptions and comments
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
///
/// Returns the trimmed value.
pub fn validate_required_text<'a>(
    value: &'a str,
    field: &str,
    max_len: usize,
) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::required(field));
    }
    check_length(value, field, max_len)?;
    Ok(value)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    check_length(value, field, max_len)
}

fn check_length(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long ({len} chars, max {max_len})"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a plaintext password against the length policy.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    check_length(password, "password", MAX_PASSWORD_LEN)
}
