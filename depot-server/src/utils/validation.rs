//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names, notes and
//! justifications; the embedded store itself enforces no text lengths.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: equipment, consumables, suppliers, departments, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, fault descriptions and step-up justifications
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: asset tags, serial numbers, receipt numbers, units
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
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

/// Validate the justification attached to a sensitive mutation.
///
/// Caught before any mutation is attempted, so a missing reason never
/// leaves partial state behind.
pub fn validate_reason(reason: &str) -> Result<(), AppError> {
    if reason.trim().is_empty() {
        return Err(AppError::new(ErrorCode::ReasonRequired));
    }
    if reason.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "reason is too long ({} chars, max {MAX_NOTE_LEN})",
            reason.len()
        )));
    }
    Ok(())
}

/// Validate the line items of a receipt or consumption slip.
pub fn validate_line_items(items: &[crate::db::models::LineItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyLineItems));
    }
    for item in items {
        if item.consumable.trim().is_empty() {
            return Err(AppError::required_field("consumable"));
        }
        if item.quantity <= 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity));
        }
        if item.unit_price.is_sign_negative() {
            return Err(AppError::new(ErrorCode::InvalidUnitPrice));
        }
        validate_required_text(&item.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("toner", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn reason_must_be_non_empty() {
        let err = validate_reason("").unwrap_err();
        assert_eq!(err.code, ErrorCode::ReasonRequired);
        assert!(validate_reason("quarterly stock correction").is_ok());
    }

    #[test]
    fn overlong_text_is_rejected() {
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(validate_reason(&long).is_err());
        assert!(validate_optional_text(&Some(long), "note", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
    }
}
