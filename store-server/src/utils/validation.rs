//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Field
//! errors aggregate into a single response so a client sees every
//! failing field at once.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, brand, user display name
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, review comments, admin responses
pub const MAX_TEXT_LEN: usize = 2000;

/// Short identifiers: phone, postal code, payment method, subcategory
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 6;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
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
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal shape check for email addresses
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation("Email is required"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "Email address is not valid",
        ));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "Email address is not valid",
        ));
    }
    Ok(())
}

/// Password length policy
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password is too long (max {MAX_PASSWORD_LEN} chars)"
        )));
    }
    Ok(())
}

/// Run a set of field checks, collecting every failure
///
/// Returns a single ValidationFailed error carrying one detail entry
/// per failing field.
pub fn validate_all(checks: Vec<(&str, Result<(), AppError>)>) -> Result<(), AppError> {
    let mut failed: Vec<(String, String)> = Vec::new();
    for (field, result) in checks {
        if let Err(err) = result {
            failed.push((field.to_string(), err.message));
        }
    }

    if failed.is_empty() {
        return Ok(());
    }

    let mut err = AppError::validation(format!(
        "Validation failed for {} field(s)",
        failed.len()
    ));
    for (field, message) in failed {
        err = err.with_detail(field, message);
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Phone", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("adaexample.com").is_err());
        assert!(validate_email("").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_all_collects_every_failure() {
        let result = validate_all(vec![
            ("name", validate_required_text("", "name", MAX_NAME_LEN)),
            ("email", validate_email("bad")),
            ("phone", Ok(())),
        ]);

        let err = result.unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(details.len(), 2);
        assert!(details.contains_key("name"));
        assert!(details.contains_key("email"));
    }
}
