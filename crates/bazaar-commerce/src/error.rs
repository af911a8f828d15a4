//! Commerce error types.

use crate::validation::FieldErrors;
use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// One or more form fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Discount outside 0..=100.
    #[error("Invalid discount percentage: {0}")]
    InvalidDiscount(u8),

    /// Order status change not allowed.
    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Unknown enum value in a document or form.
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

impl CommerceError {
    /// Field-level messages when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CommerceError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for CommerceError {
    fn from(errors: FieldErrors) -> Self {
        CommerceError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_only_on_validation() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Invalid email address");
        let err = CommerceError::from(errors);
        assert_eq!(err.field_errors().unwrap().get("email"), Some("Invalid email address"));

        assert!(CommerceError::InvalidDiscount(120).field_errors().is_none());
        assert_eq!(
            CommerceError::InvalidDiscount(120).to_string(),
            "Invalid discount percentage: 120"
        );
    }
}
