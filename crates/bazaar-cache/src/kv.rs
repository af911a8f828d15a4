//! Key-value store with automatic serialization and per-entry expiry.

use crate::CacheError;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// Type-safe cache with automatic JSON serialization.
///
/// Entries may carry a time-to-live; expired entries read as absent. A cache
/// opened with [`Cache::open`] writes itself back to its file after every
/// change, so separate processes (e.g. successive CLI runs) share state.
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<Mutex<BTreeMap<String, Entry>>>,
    path: Option<PathBuf>,
}

impl Cache {
    /// A process-local cache.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed cache, loading existing entries.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open(".bazaar/cache.json")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let bytes = std::fs::read(&path)
                .map_err(|e| CacheError::OpenError(format!("{}: {}", path.display(), e)))?;
            serde_json::from_slice(&bytes)
                .map_err(|e| CacheError::OpenError(format!("{}: {}", path.display(), e)))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            path: Some(path),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let orders: Option<Vec<Order>> = cache.get("admin:orders")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let mut entries = self.lock()?;
        let now = Utc::now();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                debug!(key, "Cache entry expired");
                entries.remove(key);
                self.persist(&entries)?;
                Ok(None)
            }
            Some(entry) => Ok(Some(serde_json::from_value(entry.value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a value with no expiry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.insert(key, value, None)
    }

    /// Set a value that expires after `ttl`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set_with_ttl("admin:orders", &orders, Duration::from_secs(60))?;
    /// ```
    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::StoreError(format!("ttl out of range: {}", e)))?;
        self.insert(key, value, Some(Utc::now() + ttl))
    }

    fn insert<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), Entry { value, expires_at });
        self.persist(&entries)
    }

    /// Delete a value. Returns whether a live entry was removed.
    pub fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut entries = self.lock()?;
        let removed = entries.remove(key);
        if removed.is_some() {
            self.persist(&entries)?;
        }
        Ok(matches!(removed, Some(entry) if !entry.is_expired(Utc::now())))
    }

    /// Check if a live key exists.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let entries = self.lock()?;
        let now = Utc::now();
        Ok(entries.get(key).is_some_and(|e| !e.is_expired(now)))
    }

    /// All live keys, optionally restricted to a prefix.
    pub fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>, CacheError> {
        let entries = self.lock()?;
        let now = Utc::now();
        Ok(entries
            .iter()
            .filter(|(k, e)| !e.is_expired(now) && prefix.map_or(true, |p| k.starts_with(p)))
            .map(|(k, _)| k.clone())
            .collect())
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let mut entries = self.lock()?;
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            self.persist(&entries)?;
        }
        Ok(removed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::StoreError("cache lock poisoned".to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, Entry>) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        if let Err(e) = std::fs::write(path, bytes) {
            warn!(path = %path.display(), error = %e, "Failed to write cache file");
            return Err(e.into());
        }
        Ok(())
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use bazaar_cache::cache_key;
///
/// let key = cache_key!("admin_session", "abc");
/// assert_eq!(key, "admin_session:abc");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
