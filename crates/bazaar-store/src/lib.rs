//! Document store client for Bazaar.
//!
//! The storefront keeps products, orders, messages and subscriptions as JSON
//! documents in a hosted content database. This crate provides the
//! [`DocumentStore`] trait with two backends:
//!
//! - [`HttpStore`]: the hosted content API (GROQ queries, mutation batches)
//! - [`MemoryStore`]: in-process, optionally snapshotted to a JSON file
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_store::prelude::*;
//!
//! let store = MemoryStore::new();
//!
//! // Decrement stock for two products in one transaction
//! let tx = Transaction::new()
//!     .patch(Patch::new("product-1").dec("inventory", 2))
//!     .patch(Patch::new("product-2").dec("inventory", 1));
//! let updated = store.commit(tx).await?;
//!
//! // Typed queries
//! let subs: Vec<Subscription> = store
//!     .query_as(&Query::of_type("newsletter").where_eq("email", "a@b.com"))
//!     .await?;
//! ```

mod error;
pub mod http;
mod memory;
mod store;
mod types;

pub use error::StoreError;
pub use http::{HttpStore, HttpStoreConfig};
pub use memory::MemoryStore;
pub use store::{DocumentStore, DocumentStoreExt};
pub use types::{
    Document, Filter, Mutation, Ordering, Patch, Query, Transaction, CREATED_AT_FIELD, ID_FIELD,
    REV_FIELD, TYPE_FIELD, UPDATED_AT_FIELD,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Document, DocumentStore, DocumentStoreExt, HttpStore, MemoryStore, Mutation, Patch, Query,
        StoreError, Transaction,
    };
}
