//! The admin secret and its comparison.

use std::fmt;

/// Environment variable holding the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// The server-side admin password.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone)]
pub struct AdminSecret(String);

impl AdminSecret {
    /// Wrap a secret. Blank secrets are treated as unset.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// Read the secret from `ADMIN_PASSWORD`.
    pub fn from_env() -> Option<Self> {
        std::env::var(ADMIN_PASSWORD_ENV).ok().and_then(Self::new)
    }

    /// Compare a candidate password in constant time.
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_compare(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminSecret(***)")
    }
}

/// Constant-time comparison to prevent timing attacks.
///
/// The length check leaks only whether lengths differ.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let secret = AdminSecret::new("hunter22").unwrap();
        assert!(secret.verify("hunter22"));
        assert!(!secret.verify("hunter23"));
        assert!(!secret.verify("hunter2"));
        assert!(!secret.verify(""));
    }

    #[test]
    fn test_blank_secret_is_unset() {
        assert!(AdminSecret::new("").is_none());
        assert!(AdminSecret::new("   ").is_none());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = AdminSecret::new("hunter22").unwrap();
        assert!(!format!("{:?}", secret).contains("hunter22"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"abcd"));
    }
}
