//! Admin login and the session guard for protected operations.

use crate::{AdminSecret, AdminSession, AuthError};
use bazaar_cache::Cache;
use chrono::{Duration, Utc};
use tracing::{error, info, warn};

/// Issues, checks and revokes admin sessions.
///
/// Sessions live in the cache under `admin_session:<token>` with a TTL equal
/// to the session lifetime.
///
/// # Example
///
/// ```rust,ignore
/// let auth = AdminAuth::new(AdminSecret::from_env(), cache);
/// let session = auth.login(&password)?;
///
/// // Later, on every protected call
/// auth.authorize(Some(session.token.as_str()))?;
/// ```
#[derive(Clone)]
pub struct AdminAuth {
    secret: Option<AdminSecret>,
    cache: Cache,
    session_duration: Duration,
}

impl AdminAuth {
    pub fn new(secret: Option<AdminSecret>, cache: Cache) -> Self {
        Self {
            secret,
            cache,
            session_duration: Duration::seconds(AdminSession::DEFAULT_DURATION_SECS),
        }
    }

    /// Set the session lifetime.
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    /// Check the password and start a session.
    pub fn login(&self, password: &str) -> Result<AdminSession, AuthError> {
        let Some(secret) = &self.secret else {
            error!("Admin login attempted but ADMIN_PASSWORD is not set");
            return Err(AuthError::SecretNotConfigured);
        };

        if !secret.verify(password) {
            warn!("Admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = AdminSession::start(self.session_duration, Utc::now());
        let ttl = self
            .session_duration
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        self.cache.set_with_ttl(&session.cache_key(), &session, ttl)?;

        info!(expires_at = %session.expires_at, "Admin session started");
        Ok(session)
    }

    /// Validate a presented token.
    ///
    /// Missing or unknown tokens are [`AuthError::Unauthorized`]; a stored
    /// session past its expiry is [`AuthError::SessionExpired`] and is removed.
    pub fn authorize(&self, token: Option<&str>) -> Result<AdminSession, AuthError> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::Unauthorized),
        };

        let key = AdminSession::key_for(token);
        let session: AdminSession = self.cache.get(&key)?.ok_or(AuthError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            self.cache.delete(&key)?;
            return Err(AuthError::SessionExpired);
        }
        Ok(session)
    }

    /// End a session. Returns whether a live session was removed.
    pub fn logout(&self, token: &str) -> Result<bool, AuthError> {
        let removed = self.cache.delete(&AdminSession::key_for(token))?;
        if removed {
            info!("Admin session ended");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AdminAuth {
        AdminAuth::new(AdminSecret::new("s3cret-pass"), Cache::in_memory())
    }

    #[test]
    fn test_login_and_authorize() {
        let auth = auth();
        let session = auth.login("s3cret-pass").unwrap();

        let checked = auth.authorize(Some(session.token.as_str())).unwrap();
        assert_eq!(checked, session);
    }

    #[test]
    fn test_wrong_password() {
        let err = auth().login("nope").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_unset_secret_rejects_everything() {
        let auth = AdminAuth::new(None, Cache::in_memory());
        assert!(matches!(auth.login("").unwrap_err(), AuthError::SecretNotConfigured));
        assert!(matches!(
            auth.login("anything").unwrap_err(),
            AuthError::SecretNotConfigured
        ));
    }

    #[test]
    fn test_missing_or_unknown_token() {
        let auth = auth();
        assert!(matches!(auth.authorize(None).unwrap_err(), AuthError::Unauthorized));
        assert!(matches!(auth.authorize(Some("")).unwrap_err(), AuthError::Unauthorized));
        assert!(matches!(
            auth.authorize(Some("forged")).unwrap_err(),
            AuthError::Unauthorized
        ));
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let cache = Cache::in_memory();
        let auth = AdminAuth::new(AdminSecret::new("pw"), cache.clone());

        // Stored without a cache TTL so the session's own expiry is checked
        let session = AdminSession::start(Duration::seconds(-1), Utc::now());
        cache.set(&session.cache_key(), &session).unwrap();

        let err = auth.authorize(Some(session.token.as_str())).unwrap_err();
        assert!(matches!(err, AuthError::SessionExpired));
        assert!(!cache.exists(&session.cache_key()).unwrap());
    }

    #[test]
    fn test_logout() {
        let auth = auth();
        let session = auth.login("s3cret-pass").unwrap();

        assert!(auth.logout(session.token.as_str()).unwrap());
        assert!(matches!(
            auth.authorize(Some(session.token.as_str())).unwrap_err(),
            AuthError::Unauthorized
        ));
        assert!(!auth.logout(session.token.as_str()).unwrap());
    }
}
