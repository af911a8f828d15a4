//! In-process document store with an optional JSON snapshot on disk.

use crate::types::{CREATED_AT_FIELD, ID_FIELD, REV_FIELD, UPDATED_AT_FIELD};
use crate::{Document, DocumentStore, Mutation, Patch, Query, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Document store held in memory.
///
/// Writes take an exclusive lock, so a transaction is applied to a copy of
/// the documents and swapped in only when every mutation succeeded. When
/// opened with a snapshot path, every write rewrites the file and is rolled
/// back in memory if that fails.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<BTreeMap<String, Document>>>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// An empty store with no snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a snapshot file, loading it if present.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut docs = BTreeMap::new();

        if tokio::fs::try_exists(&path).await? {
            let bytes = tokio::fs::read(&path).await?;
            let loaded: Vec<Document> = serde_json::from_slice(&bytes)?;
            for doc in loaded {
                let id = doc
                    .id()
                    .ok_or_else(|| StoreError::InvalidDocument("snapshot entry without _id".into()))?
                    .to_string();
                docs.insert(id, doc);
            }
            info!(path = %path.display(), documents = docs.len(), "Loaded store snapshot");
        }

        Ok(Self {
            docs: Arc::new(RwLock::new(docs)),
            snapshot: Some(path),
        })
    }

    /// A store pre-filled with documents.
    pub async fn with_documents(docs: impl IntoIterator<Item = Document>) -> Result<Self, StoreError> {
        let store = Self::new();
        for doc in docs {
            store.create(doc).await?;
        }
        Ok(store)
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    async fn persist(&self, docs: &BTreeMap<String, Document>) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let all: Vec<&Document> = docs.values().collect();
        let bytes = serde_json::to_vec_pretty(&all)?;
        tokio::fs::write(path, bytes).await?;
        debug!(path = %path.display(), documents = all.len(), "Wrote store snapshot");
        Ok(())
    }
}

fn apply_create(
    docs: &mut BTreeMap<String, Document>,
    mut doc: Document,
    now: &str,
) -> Result<Document, StoreError> {
    if doc.doc_type().is_none() {
        return Err(StoreError::InvalidDocument("document without _type".into()));
    }
    let existing = doc.id().filter(|id| !id.is_empty()).map(str::to_string);
    let id = match existing {
        Some(id) => id,
        None => {
            let id = random_hex();
            doc.set(ID_FIELD, Value::String(id.clone()));
            id
        }
    };
    if docs.contains_key(&id) {
        return Err(StoreError::Conflict(id));
    }
    doc.set(CREATED_AT_FIELD, Value::String(now.to_string()));
    doc.set(UPDATED_AT_FIELD, Value::String(now.to_string()));
    doc.set(REV_FIELD, Value::String(random_hex()));
    docs.insert(id, doc.clone());
    Ok(doc)
}

fn apply_patch(
    docs: &mut BTreeMap<String, Document>,
    patch: &Patch,
    now: &str,
) -> Result<Document, StoreError> {
    let mut doc = docs
        .get(&patch.id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(patch.id.clone()))?;
    patch.apply(&mut doc)?;
    doc.set(UPDATED_AT_FIELD, Value::String(now.to_string()));
    doc.set(REV_FIELD, Value::String(random_hex()));
    docs.insert(patch.id.clone(), doc.clone());
    Ok(doc)
}

fn random_hex() -> String {
    use rand::Rng;
    let bytes: [u8; 8] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Order two field values: timestamps chronologically, numbers numerically,
/// other strings lexicographically. Missing values sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let docs = self.docs.read().await;
        let mut found: Vec<Document> = docs.values().filter(|d| query.matches(d)).cloned().collect();

        if let Some(order) = &query.order {
            found.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        if let Some(limit) = query.limit {
            found.truncate(limit);
        }

        debug!(doc_type = %query.doc_type, results = found.len(), "Query");
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn create(&self, doc: Document) -> Result<Document, StoreError> {
        let mut docs = self.docs.write().await;
        let created = apply_create(&mut docs, doc, &timestamp())?;
        let id = created.id().unwrap_or_default();
        if let Err(e) = self.persist(&docs).await {
            docs.remove(id);
            return Err(e);
        }
        debug!(id, "Created document");
        Ok(created)
    }

    async fn patch(&self, patch: Patch) -> Result<Document, StoreError> {
        let mut docs = self.docs.write().await;
        let previous = docs.get(&patch.id).cloned();
        let patched = apply_patch(&mut docs, &patch, &timestamp())?;
        if let Err(e) = self.persist(&docs).await {
            if let Some(previous) = previous {
                docs.insert(patch.id.clone(), previous);
            }
            return Err(e);
        }
        debug!(id = %patch.id, "Patched document");
        Ok(patched)
    }

    async fn transaction(&self, mutations: Vec<Mutation>) -> Result<Vec<Document>, StoreError> {
        let mut docs = self.docs.write().await;
        let mut staged = docs.clone();
        let now = timestamp();

        let mut results = Vec::with_capacity(mutations.len());
        for mutation in mutations {
            let doc = match mutation {
                Mutation::Create(doc) => apply_create(&mut staged, doc, &now)?,
                Mutation::Patch(patch) => apply_patch(&mut staged, &patch, &now)?,
            };
            results.push(doc);
        }

        self.persist(&staged).await?;
        *docs = staged;
        debug!(mutations = results.len(), "Committed transaction");
        Ok(results)
    }
}
