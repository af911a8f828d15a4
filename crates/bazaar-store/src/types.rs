//! Documents, queries and mutations.

use crate::StoreError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reserved field holding the document id.
pub const ID_FIELD: &str = "_id";
/// Reserved field holding the document type.
pub const TYPE_FIELD: &str = "_type";
/// Creation timestamp, maintained by the store.
pub const CREATED_AT_FIELD: &str = "_createdAt";
/// Last update timestamp, maintained by the store.
pub const UPDATED_AT_FIELD: &str = "_updatedAt";
/// Revision tag, changed on every write.
pub const REV_FIELD: &str = "_rev";

/// A stored document: a JSON object carrying `_id` and `_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Serialize `value` into a document of type `doc_type`.
    ///
    /// The value must serialize to a JSON object.
    pub fn from_value<T: Serialize>(doc_type: &str, value: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(value)? {
            Value::Object(mut map) => {
                map.insert(TYPE_FIELD.to_string(), Value::String(doc_type.to_string()));
                Ok(Self(map))
            }
            other => Err(StoreError::InvalidDocument(format!(
                "expected an object for {}, got {}",
                doc_type, other
            ))),
        }
    }

    /// Wrap a raw JSON object.
    pub fn from_json(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::InvalidDocument(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn doc_type(&self) -> Option<&str> {
        self.0.get(TYPE_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Integer value of `field`, if present and integral.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserialize the document into a type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Equality condition on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// Sort order for query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

/// A parameterised query: all documents of one type whose fields equal the
/// given values.
///
/// # Example
///
/// ```rust
/// use bazaar_store::Query;
///
/// let query = Query::of_type("newsletter").where_eq("email", "a@b.com").limit(1);
/// assert_eq!(query.filters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub doc_type: String,
    pub filters: Vec<Filter>,
    pub order: Option<Ordering>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn of_type(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Add an equality filter.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Ordering {
            field: field.into(),
            descending: false,
        });
        self
    }

    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Ordering {
            field: field.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `doc` satisfies the type and every filter.
    pub fn matches(&self, doc: &Document) -> bool {
        doc.doc_type() == Some(self.doc_type.as_str())
            && self
                .filters
                .iter()
                .all(|f| doc.get(&f.field) == Some(&f.value))
    }
}

/// Field changes applied to one existing document.
///
/// Serializes in the mutation wire shape:
/// `{"id": ..., "set": {...}, "inc": {...}, "dec": {...}, "unset": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub set: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inc: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dec: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unset: Vec<String>,
}

impl Patch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    pub fn inc(mut self, field: impl Into<String>, by: i64) -> Self {
        *self.inc.entry(field.into()).or_insert(0) += by;
        self
    }

    pub fn dec(mut self, field: impl Into<String>, by: i64) -> Self {
        *self.dec.entry(field.into()).or_insert(0) += by;
        self
    }

    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.unset.push(field.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.inc.is_empty() && self.dec.is_empty() && self.unset.is_empty()
    }

    /// Apply the changes to `doc` in place. On error `doc` may be partly
    /// changed, so callers apply to a copy.
    ///
    /// `inc`/`dec` require the field to hold an integer. Reserved `_` fields
    /// cannot be set or unset.
    pub fn apply(&self, doc: &mut Document) -> Result<(), StoreError> {
        for field in self.set.keys().chain(self.unset.iter()) {
            if field.starts_with('_') {
                return Err(StoreError::InvalidDocument(format!(
                    "cannot modify reserved field {}",
                    field
                )));
            }
        }

        for (field, value) in &self.set {
            doc.set(field.clone(), value.clone());
        }
        for field in &self.unset {
            doc.remove(field);
        }

        let deltas = self
            .inc
            .iter()
            .map(|(f, by)| (f, *by))
            .chain(self.dec.iter().map(|(f, by)| (f, -*by)));
        for (field, delta) in deltas {
            let current = doc.get_i64(field).ok_or_else(|| {
                StoreError::InvalidDocument(format!(
                    "{} on {} is missing or not an integer",
                    field, self.id
                ))
            })?;
            let next = current.checked_add(delta).ok_or_else(|| {
                StoreError::InvalidDocument(format!("{} on {} overflows", field, self.id))
            })?;
            doc.set(field.clone(), Value::from(next));
        }

        Ok(())
    }
}

/// One step of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    Create(Document),
    Patch(Patch),
}

/// A batch of mutations committed together: all apply or none do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    mutations: Vec<Mutation>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, doc: Document) -> Self {
        self.mutations.push(Mutation::Create(doc));
        self
    }

    pub fn patch(mut self, patch: Patch) -> Self {
        self.mutations.push(Mutation::Patch(patch));
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }
}
