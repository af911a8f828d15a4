//! Shop settings.
//!
//! Loaded from `bazaar.toml` (or JSON); secrets come from the environment.

use crate::ActionError;
use bazaar_auth::{AdminSecret, ADMIN_PASSWORD_ENV};
use bazaar_commerce::Money;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the hosted store's API token.
pub const STORE_TOKEN_ENV: &str = "BAZAAR_STORE_TOKEN";

/// All settings for a shop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub orders: OrderSettings,

    #[serde(default)]
    pub admin: AdminSettings,
}

impl Settings {
    /// Load settings from a file; `.json` files are parsed as JSON, anything
    /// else as TOML. Environment secrets are applied afterwards.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ActionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ActionError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let settings = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|e| match e {
            ActionError::Config(msg) => ActionError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

        Ok(settings.with_env())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ActionError> {
        toml::from_str(content).map_err(|e| ActionError::Config(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self, ActionError> {
        serde_json::from_str(content).map_err(|e| ActionError::Config(e.to_string()))
    }

    /// Fill secrets from `ADMIN_PASSWORD` and `BAZAAR_STORE_TOKEN`.
    pub fn with_env(mut self) -> Self {
        if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
            self.admin.password = Some(password);
        }
        if let Ok(token) = std::env::var(STORE_TOKEN_ENV) {
            self.store.token = Some(token);
        }
        self
    }

    /// Resolve relative paths against `base` (usually the settings file's
    /// directory).
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.store.snapshot = self.store.snapshot.map(resolve);
        self.cache.path = self.cache.path.map(resolve);
        self
    }
}

/// Which document store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Http,
}

/// Content store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Snapshot file for the memory backend.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// Project URL for the hosted backend.
    #[serde(default)]
    pub project_url: Option<String>,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    #[serde(default)]
    pub api_version: Option<String>,

    /// API token, taken from the environment only.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_dataset() -> String {
    "production".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            snapshot: None,
            project_url: None,
            dataset: default_dataset(),
            api_version: None,
            token: None,
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Backing file. Without one the cache lives for the process only.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long the admin orders listing stays cached.
    #[serde(default = "default_orders_ttl_secs")]
    pub orders_ttl_secs: u64,
}

fn default_orders_ttl_secs() -> u64 {
    60
}

impl CacheSettings {
    pub fn orders_ttl(&self) -> Duration {
        Duration::from_secs(self.orders_ttl_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: None,
            orders_ttl_secs: default_orders_ttl_secs(),
        }
    }
}

/// Order placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSettings {
    /// Flat shipping fee in whole rupees.
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee: i64,

    /// Commit the order and its inventory decrements in one transaction.
    #[serde(default)]
    pub atomic_placement: bool,
}

fn default_shipping_fee() -> i64 {
    200
}

impl OrderSettings {
    pub fn shipping_fee(&self) -> Money {
        Money::rupees(self.shipping_fee)
    }
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            shipping_fee: default_shipping_fee(),
            atomic_placement: false,
        }
    }
}

/// Admin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,

    /// Admin password, taken from the environment only.
    #[serde(skip)]
    pub password: Option<String>,
}

fn default_session_ttl_secs() -> i64 {
    8 * 60 * 60
}

impl AdminSettings {
    pub fn secret(&self) -> Option<AdminSecret> {
        self.password.clone().and_then(AdminSecret::new)
    }

    pub fn session_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.store.dataset, "production");
        assert_eq!(settings.orders.shipping_fee(), Money::rupees(200));
        assert!(!settings.orders.atomic_placement);
        assert_eq!(settings.cache.orders_ttl(), Duration::from_secs(60));
        assert_eq!(settings.admin.session_ttl_secs, 28_800);
    }

    #[test]
    fn test_parse_toml() {
        let settings = Settings::from_toml_str(
            r#"
            [store]
            backend = "http"
            project_url = "https://abc.api.sanity.io"
            dataset = "staging"

            [orders]
            shipping_fee = 250
            atomic_placement = true

            [admin]
            session_ttl_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(settings.store.backend, StoreBackend::Http);
        assert_eq!(settings.store.dataset, "staging");
        assert_eq!(settings.orders.shipping_fee(), Money::rupees(250));
        assert!(settings.orders.atomic_placement);
        assert_eq!(settings.admin.session_duration(), chrono::Duration::seconds(600));
    }

    #[test]
    fn test_parse_json() {
        let settings =
            Settings::from_json_str(r#"{"orders": {"shipping_fee": 0}}"#).unwrap();
        assert!(settings.orders.shipping_fee().is_zero());
    }

    #[test]
    fn test_secrets_are_not_read_from_file() {
        let settings = Settings::from_toml_str(
            r#"
            [admin]
            password = "in-the-file"
            "#,
        )
        .unwrap();
        assert!(settings.admin.password.is_none());
    }

    #[test]
    fn test_invalid_backend() {
        let err = Settings::from_toml_str("[store]\nbackend = \"postgres\"").unwrap_err();
        assert!(matches!(err, ActionError::Config(_)));
    }

    #[test]
    fn test_relative_paths() {
        let mut settings = Settings::default();
        settings.store.snapshot = Some(PathBuf::from(".bazaar/store.json"));
        settings.cache.path = Some(PathBuf::from("/tmp/cache.json"));

        let settings = settings.relative_to(Path::new("/srv/shop"));
        assert_eq!(
            settings.store.snapshot,
            Some(PathBuf::from("/srv/shop/.bazaar/store.json"))
        );
        assert_eq!(settings.cache.path, Some(PathBuf::from("/tmp/cache.json")));
    }
}
