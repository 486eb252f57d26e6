use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Per-field validation messages for a rejected request body.
    Validation(Vec<String>),
    /// Unique-index violation (MongoDB error code 11000).
    Conflict { field: String, value: String },
    NotFound(String),
    Database(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(messages) => {
                write!(f, "Validation failed: {}", messages.join("; "))
            }
            AppError::Conflict { field, value } => {
                write!(f, "The {} \"{}\" already exists", field, value)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// True when the driver error is a duplicate-key write failure (code 11000).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we))
            if we.code == 11000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_names_field_and_value() {
        let err = AppError::Conflict {
            field: "email".to_string(),
            value: "jane@example.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The email \"jane@example.com\" already exists"
        );
    }

    #[test]
    fn validation_joins_messages() {
        let err = AppError::Validation(vec![
            "Name is required".to_string(),
            "Email is invalid".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Name is required; Email is invalid"
        );
    }
}
