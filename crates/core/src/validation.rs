//! Request payload validation helpers shared by the HTTP handlers.

use crate::error::CoreError;

/// Fail with [`CoreError::MissingFields`] naming every absent field.
///
/// Each entry pairs the field's wire name with whether it was supplied.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), CoreError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::MissingFields(missing))
    }
}

/// A string field counts as present when it is set and not blank.
pub fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Flatten `validator` derive errors into a single [`CoreError::Validation`].
pub fn from_validation_errors(errors: validator::ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{field}: {}", codes.join(", "))
        })
        .collect();
    parts.sort();
    CoreError::Validation(parts.join("; "))
}
