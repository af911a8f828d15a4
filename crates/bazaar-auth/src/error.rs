//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong admin password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No admin secret is configured, so nobody can log in.
    #[error("admin password is not configured")]
    SecretNotConfigured,

    /// No session token was presented, or it is unknown.
    #[error("unauthorized")]
    Unauthorized,

    /// The session existed but has expired.
    #[error("session expired")]
    SessionExpired,

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] bazaar_cache::CacheError),
}

impl AuthError {
    /// Check if this is an authentication failure rather than an
    /// infrastructure problem.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::Unauthorized | AuthError::SessionExpired
        )
    }
}
