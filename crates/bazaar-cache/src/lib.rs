//! Key-value caching layer for Bazaar.
//!
//! Provides a small, ergonomic cache with automatic JSON serialization and
//! optional per-entry expiry. Used for admin sessions and for short-lived
//! listings that are invalidated on writes.
//!
//! # Example
//!
//! ```rust
//! use bazaar_cache::{cache_key, Cache};
//! use std::time::Duration;
//!
//! let cache = Cache::in_memory();
//!
//! // Store a value that expires after a minute
//! let key = cache_key!("admin", "orders");
//! cache.set_with_ttl(&key, &vec!["ORD-1"], Duration::from_secs(60)).unwrap();
//!
//! // Retrieve it
//! let orders: Option<Vec<String>> = cache.get(&key).unwrap();
//! assert_eq!(orders, Some(vec!["ORD-1".to_string()]));
//!
//! // Invalidate it
//! cache.delete(&key).unwrap();
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError};
}
