//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on:
//! - Reasonable UX limits for names, notes, reasons
//! - Downstream carrier/label systems truncating around 200 chars

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: recipient full name, carrier, service name, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, reasons, dispute detail (order note, cancel reason, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, voucher code, tracking code
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Address lines and city names
pub const MAX_ADDRESS_LEN: usize = 500;

/// Cancel/return/dispute reasons must carry some substance
pub const MIN_REASON_LEN: usize = 10;

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

/// Validate a free-text reason (min + max length).
///
/// 取消/退货/争议必须给出有实质内容的理由。
pub fn validate_reason(value: &str, field: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.len() < MIN_REASON_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at least {MIN_REASON_LEN} chars"
        )));
    }
    if value.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {MAX_NOTE_LEN})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_overlong() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(MAX_NAME_LEN + 1), "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Nguyen Van A", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn reason_enforces_min_length() {
        assert!(validate_reason("too short", "reason").is_err());
        assert!(validate_reason("the seller shipped the wrong color variant", "reason").is_ok());
    }
}
