use crate::error::{DossierError, Result};

/// Fails with a validation error when `value` is blank.
pub fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DossierError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Trims an optional text field; blank becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Order codes for new projects are stored trimmed and upper-cased.
pub fn normalize_new_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}
