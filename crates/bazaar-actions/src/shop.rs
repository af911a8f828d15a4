//! The shared handles every action runs against.

use crate::settings::{Settings, StoreBackend};
use crate::ActionError;
use bazaar_auth::AdminAuth;
use bazaar_cache::Cache;
use bazaar_store::{DocumentStore, HttpStore, HttpStoreConfig, MemoryStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Cache key of the admin orders listing.
pub const ADMIN_ORDERS_KEY: &str = "admin:orders";

/// A storefront: content store, cache, admin guard and settings.
///
/// Cheap to clone; clones share the same store and cache.
#[derive(Clone)]
pub struct Shop {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) cache: Cache,
    pub(crate) auth: AdminAuth,
    pub(crate) settings: Settings,
}

impl Shop {
    /// Assemble a shop from explicit parts.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Cache, settings: Settings) -> Self {
        let auth = AdminAuth::new(settings.admin.secret(), cache.clone())
            .with_session_duration(settings.admin.session_duration());
        Self {
            store,
            cache,
            auth,
            settings,
        }
    }

    /// Open the backends named in `settings`.
    pub async fn open(settings: Settings) -> Result<Self, ActionError> {
        let store: Arc<dyn DocumentStore> = match settings.store.backend {
            StoreBackend::Memory => match &settings.store.snapshot {
                Some(path) => {
                    info!(path = %path.display(), "Opening memory store with snapshot");
                    Arc::new(MemoryStore::open(path).await?)
                }
                None => Arc::new(MemoryStore::new()),
            },
            StoreBackend::Http => {
                let url = settings.store.project_url.clone().ok_or_else(|| {
                    ActionError::Config("store.project_url is required for the http backend".into())
                })?;
                let mut config = HttpStoreConfig::new(url, settings.store.dataset.clone());
                if let Some(version) = &settings.store.api_version {
                    config.api_version = version.clone();
                }
                if let Some(token) = &settings.store.token {
                    config = config.with_token(token.clone());
                }
                info!(project = %config.project_url, dataset = %config.dataset, "Using hosted store");
                Arc::new(HttpStore::new(config)?)
            }
        };

        let cache = match &settings.cache.path {
            Some(path) => Cache::open(path)?,
            None => Cache::in_memory(),
        };

        Ok(Self::new(store, cache, settings))
    }

    /// A shop over a fresh in-memory store and cache.
    pub fn in_memory(settings: Settings) -> Self {
        Self::new(Arc::new(MemoryStore::new()), Cache::in_memory(), settings)
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Drop the cached admin orders listing. Failures are logged, not raised.
    pub(crate) fn invalidate_orders(&self) {
        if let Err(e) = self.cache.delete(ADMIN_ORDERS_KEY) {
            warn!(error = %e, "Failed to invalidate cached orders");
        }
    }
}
