//! The document store interface.

use crate::{Document, Mutation, Patch, Query, StoreError, Transaction};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Operations the storefront needs from a document database.
///
/// Implementations must apply a transaction's mutations all-or-none.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a query and return matching documents.
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Fetch one document by id.
    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create a single document. Fails if the id is taken.
    async fn create(&self, doc: Document) -> Result<Document, StoreError>;

    /// Patch one existing document and return it as stored.
    async fn patch(&self, patch: Patch) -> Result<Document, StoreError>;

    /// Commit a batch of mutations together and return the resulting
    /// documents in mutation order.
    async fn transaction(&self, mutations: Vec<Mutation>) -> Result<Vec<Document>, StoreError>;
}

/// Typed helpers over any [`DocumentStore`].
///
/// # Example
///
/// ```rust,ignore
/// let subs: Vec<Subscription> = store
///     .query_as(&Query::of_type("newsletter").where_eq("email", email))
///     .await?;
/// ```
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Run a query and deserialize every result.
    async fn query_as<T: DeserializeOwned + Send>(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        self.query(query)
            .await?
            .iter()
            .map(Document::deserialize)
            .collect()
    }

    /// Run a query and deserialize the first result, if any.
    async fn query_optional<T: DeserializeOwned + Send>(
        &self,
        query: &Query,
    ) -> Result<Option<T>, StoreError> {
        let limited = query.clone().limit(1);
        match self.query(&limited).await?.first() {
            Some(doc) => Ok(Some(doc.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Fetch a document by id and deserialize it.
    async fn get_as<T: DeserializeOwned + Send>(&self, id: &str) -> Result<Option<T>, StoreError> {
        match self.get(id).await? {
            Some(doc) => Ok(Some(doc.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` as a `doc_type` document and create it.
    async fn create_as<T: Serialize + Sync>(
        &self,
        doc_type: &str,
        value: &T,
    ) -> Result<Document, StoreError> {
        self.create(Document::from_value(doc_type, value)?).await
    }

    /// Count documents matching a query.
    async fn count(&self, query: &Query) -> Result<usize, StoreError> {
        Ok(self.query(query).await?.len())
    }

    /// Commit a [`Transaction`].
    async fn commit(&self, tx: Transaction) -> Result<Vec<Document>, StoreError> {
        self.transaction(tx.into_mutations()).await
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}
