//! Client for the hosted content API.
//!
//! Queries are rendered to GROQ with every value passed as a `$param`, so
//! user input never lands inside the query text.

use crate::{Document, DocumentStore, Mutation, Patch, Query, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// API version segment used in every request path.
pub const DEFAULT_API_VERSION: &str = "v2021-10-21";

/// Connection settings for [`HttpStore`].
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Project base URL, e.g. `https://abc123.api.sanity.io`.
    pub project_url: String,
    pub dataset: String,
    pub api_version: String,
    /// Write token. Reads work without one on public datasets.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl HttpStoreConfig {
    pub fn new(project_url: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: None,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn endpoint(&self, kind: &str) -> String {
        format!(
            "{}/{}/data/{}/{}",
            self.project_url.trim_end_matches('/'),
            self.api_version,
            kind,
            self.dataset
        )
    }
}

/// A query rendered for the wire: GROQ text plus its JSON-encoded params.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub groq: String,
    pub params: Vec<(String, String)>,
}

/// Render a [`Query`] to GROQ.
///
/// ```rust
/// use bazaar_store::{http::render_query, Query};
///
/// let q = render_query(&Query::of_type("newsletter").where_eq("email", "a@b.com").limit(1));
/// assert_eq!(q.groq, "*[_type == $type && email == $p0][0...1]");
/// ```
pub fn render_query(query: &Query) -> RenderedQuery {
    let mut conditions = vec!["_type == $type".to_string()];
    let mut params = vec![("$type".to_string(), Value::from(query.doc_type.clone()).to_string())];

    for (i, filter) in query.filters.iter().enumerate() {
        conditions.push(format!("{} == $p{}", filter.field, i));
        params.push((format!("$p{}", i), filter.value.to_string()));
    }

    let mut groq = format!("*[{}]", conditions.join(" && "));
    if let Some(order) = &query.order {
        let dir = if order.descending { "desc" } else { "asc" };
        groq.push_str(&format!(" | order({} {})", order.field, dir));
    }
    if let Some(limit) = query.limit {
        groq.push_str(&format!("[0...{}]", limit));
    }

    RenderedQuery { groq, params }
}

#[derive(Deserialize)]
struct QueryResponse {
    result: Vec<Document>,
}

#[derive(Deserialize)]
struct DocResponse {
    documents: Vec<Document>,
}

#[derive(Serialize)]
struct MutateRequest<'a> {
    mutations: &'a [Mutation],
}

#[derive(Deserialize)]
struct MutateResponse {
    results: Vec<MutateResult>,
}

#[derive(Deserialize)]
struct MutateResult {
    #[serde(default)]
    document: Option<Document>,
}

/// Document store backed by the hosted HTTP API.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpStore {
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn mutate(&self, mutations: &[Mutation]) -> Result<Vec<Document>, StoreError> {
        if self.config.token.is_none() {
            warn!("Writing to the content API without a token");
        }
        let url = self.config.endpoint("mutate");
        let request = self
            .client
            .post(&url)
            .query(&[("returnDocuments", "true")])
            .json(&MutateRequest { mutations });

        let response = check(self.authorize(request).send().await?).await?;
        let body: MutateResponse = response.json().await?;

        body.results
            .into_iter()
            .map(|r| {
                r.document.ok_or_else(|| {
                    StoreError::Serialization("mutation result without document".into())
                })
            })
            .collect()
    }
}

/// Map error statuses onto store errors.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT => StoreError::Conflict(message),
        _ => StoreError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let rendered = render_query(query);
        debug!(groq = %rendered.groq, "Query");

        let mut pairs = vec![("query".to_string(), rendered.groq)];
        pairs.extend(rendered.params);
        let request = self.client.get(self.config.endpoint("query")).query(&pairs);

        let response = check(self.authorize(request).send().await?).await?;
        let body: QueryResponse = response.json().await?;
        Ok(body.result)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let url = format!("{}/{}", self.config.endpoint("doc"), id);
        let request = self.client.get(&url);
        let response = match check(self.authorize(request).send().await?).await {
            Ok(response) => response,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let body: DocResponse = response.json().await?;
        Ok(body.documents.into_iter().next())
    }

    async fn create(&self, doc: Document) -> Result<Document, StoreError> {
        let mut docs = self.mutate(&[Mutation::Create(doc)]).await?;
        docs.pop()
            .ok_or_else(|| StoreError::Serialization("empty mutation response".into()))
    }

    async fn patch(&self, patch: Patch) -> Result<Document, StoreError> {
        let mut docs = self.mutate(&[Mutation::Patch(patch)]).await?;
        docs.pop()
            .ok_or_else(|| StoreError::Serialization("empty mutation response".into()))
    }

    async fn transaction(&self, mutations: Vec<Mutation>) -> Result<Vec<Document>, StoreError> {
        debug!(mutations = mutations.len(), "Committing transaction");
        self.mutate(&mutations).await
    }
}
