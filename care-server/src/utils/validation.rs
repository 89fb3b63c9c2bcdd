//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Task titles
pub const MAX_TITLE_LEN: usize = 200;

/// Person / room names
pub const MAX_NAME_LEN: usize = 100;

/// Descriptions, alert messages
pub const MAX_NOTE_LEN: usize = 2000;

/// Chat messages, voice command transcripts
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Forum post bodies
pub const MAX_POST_LEN: usize = 10_000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Length in characters, not UTF-8 bytes
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    let len = char_len(value);
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && char_len(v) > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            char_len(v)
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// WGS84 latitude / longitude ranges
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::validation(format!(
            "invalid coordinates ({latitude}, {longitude})"
        )));
    }
    Ok(())
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!("'{email}' is not a valid email address"))
            .with_detail("field", "email"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if char_len(password) < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .with_detail("field", "password"));
    }
    if char_len(password) > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        ))
        .with_detail("field", "password"));
    }
    Ok(())
}
