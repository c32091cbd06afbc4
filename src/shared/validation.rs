//! Validation Utilities
//!
//! Bridges `validator` derive output into the API error envelope.

use validator::ValidationErrors;

use super::error::{AppError, FieldError};

/// Convert validator output into an [`AppError::Validation`] carrying
/// field-level detail. The top-level message names the first failing field
/// so simple clients get something readable without parsing `errors`.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for {}", field)),
            })
        })
        .collect();

    let message = fields
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation { message, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct SignupForm<'a> {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: &'a str,
        #[validate(email(message = "Invalid email address"))]
        email: &'a str,
    }

    #[test]
    fn test_carries_field_level_errors() {
        let bad = SignupForm {
            name: "x",
            email: "not-an-email",
        };
        let err = validation_error(bad.validate().unwrap_err());

        match err {
            AppError::Validation { message, fields } => {
                assert_eq!(fields.len(), 2);
                assert!(fields.iter().any(|f| f.field == "name"));
                assert!(fields.iter().any(|f| f.field == "email"));
                assert!(!message.is_empty());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
