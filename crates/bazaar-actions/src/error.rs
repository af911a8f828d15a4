//! Action errors.

use bazaar_auth::AuthError;
use bazaar_cache::CacheError;
use bazaar_commerce::{CommerceError, FieldErrors};
use bazaar_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by storefront and admin actions.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Form input failed validation. Nothing was written.
    #[error("Please correct the highlighted fields")]
    Validation(FieldErrors),

    /// The request was well-formed but conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// A referenced document does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Missing, unknown or expired admin session, or a rejected login.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The content store failed or refused a request.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Cache failure.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Settings could not be loaded or are inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain rule violation not tied to a form field.
    #[error("{0}")]
    Domain(CommerceError),
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::Validation(_) | ActionError::Domain(_) => ErrorKind::Validation,
            ActionError::Conflict(_) => ErrorKind::Conflict,
            ActionError::NotFound(_) => ErrorKind::NotFound,
            ActionError::Unauthorized(_) => ErrorKind::Unauthorized,
            ActionError::Store(_) | ActionError::Cache(_) => ErrorKind::Persistence,
            ActionError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<CommerceError> for ActionError {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::Validation(errors) => ActionError::Validation(errors),
            other => ActionError::Domain(other),
        }
    }
}

impl From<FieldErrors> for ActionError {
    fn from(errors: FieldErrors) -> Self {
        ActionError::Validation(errors)
    }
}

impl From<AuthError> for ActionError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Cache(e) => ActionError::Cache(e),
            AuthError::SecretNotConfigured => {
                ActionError::Unauthorized("admin login is not available".to_string())
            }
            other => ActionError::Unauthorized(other.to_string()),
        }
    }
}

/// Coarse classification of a failed action, for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unauthorized,
    Persistence,
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_validation_maps_to_validation() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Email is required");
        let err: ActionError = CommerceError::Validation(errors).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, ActionError::Validation(ref e) if e.get("email").is_some()));
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        let err: ActionError = AuthError::SessionExpired.into();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "Unauthorized: session expired");

        let err: ActionError = AuthError::SecretNotConfigured.into();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_store_errors_are_persistence() {
        let err: ActionError = StoreError::Connection("refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }
}
