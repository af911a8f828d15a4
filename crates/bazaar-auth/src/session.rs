//! Admin sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Opaque session token handed to the admin client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an existing token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate a new random token: 24 random bytes, URL-safe base64.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 24] = rand::thread_rng().gen();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A logged-in admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    pub token: SessionToken,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Default session duration: 8 hours.
    pub const DEFAULT_DURATION_SECS: i64 = 8 * 60 * 60;

    /// Cache key prefix for stored sessions.
    pub const KEY_PREFIX: &'static str = "admin_session";

    /// Start a session lasting `duration` from `now`.
    pub fn start(duration: Duration, now: DateTime<Utc>) -> Self {
        Self {
            token: SessionToken::generate(),
            created_at: now,
            expires_at: now + duration,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Seconds left before expiry, never negative.
    pub fn time_to_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// Cache key for this session.
    pub fn cache_key(&self) -> String {
        Self::key_for(self.token.as_str())
    }

    pub fn key_for(token: &str) -> String {
        bazaar_cache::cache_key!(Self::KEY_PREFIX, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generate_format() {
        let token = SessionToken::generate();
        // 24 bytes in unpadded base64 is 32 chars
        assert_eq!(token.as_str().len(), 32);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_token_generate_uniqueness() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn test_token_serializes_as_string() {
        let token = SessionToken::new("abc");
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""abc""#);
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = AdminSession::start(Duration::seconds(60), now);

        assert!(!session.is_expired(now));
        assert_eq!(session.time_to_expiry(now), 60);
        assert!(session.is_expired(now + Duration::seconds(60)));
        assert_eq!(session.time_to_expiry(now + Duration::seconds(120)), 0);
    }

    #[test]
    fn test_cache_key() {
        let session = AdminSession {
            token: SessionToken::new("tok"),
            created_at: Utc::now(),
            expires_at: Utc::now(),
        };
        assert_eq!(session.cache_key(), "admin_session:tok");
    }
}
