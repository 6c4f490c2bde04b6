//! Common validation utilities.

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// Separator used when several validation messages are reported together.
pub const MESSAGE_SEPARATOR: &str = ", ";

/// Validates that a required text field is not empty or whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("is a required field".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a value is a canonical UUID string.
pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("is a required field".into());
        return Err(err);
    }

    match Uuid::parse_str(value) {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut err = ValidationError::new("uuid");
            err.message = Some("must be a valid UUID".into());
            Err(err)
        }
    }
}

/// Flattens validation errors into human-readable messages.
///
/// Each message is prefixed with its field name. Fields are reported in
/// alphabetical order so the output is stable.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => format!("{} {}", field, message),
                    None => format!("{} is invalid ({})", field, e.code),
                })
                .collect();
            (field, messages)
        })
        .collect();

    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().flat_map(|(_, messages)| messages).collect()
}

/// Joins all validation messages into a single string.
pub fn join_messages(errors: &ValidationErrors) -> String {
    collect_messages(errors).join(MESSAGE_SEPARATOR)
}
