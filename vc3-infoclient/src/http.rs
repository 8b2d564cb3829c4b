//! HTTP client for a remote information service.
//!
//! Wire protocol:
//! - `GET  {endpoint}/info/{collection}` returns `{"<collection>": {...}}`
//!   with the document version in the `ETag` header, or 404.
//! - `PUT  {endpoint}/info/{collection}` with body `{"<collection>": patch}`
//!   merges the patch. `If-Match` / `If-None-Match: *` make it conditional;
//!   a failed precondition is answered with 412.

use crate::config::{InfoClientConfig, StoreAuth};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, DocumentVersion, VersionedDocument, WriteCondition};
use async_trait::async_trait;
use reqwest::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Information service client over HTTP.
#[derive(Debug, Clone)]
pub struct InfoClient {
    config: InfoClientConfig,
    timeout: Duration,
    client: Client,
}

impl InfoClient {
    /// Creates a client. Fails if the config is invalid.
    pub fn new(config: InfoClientConfig) -> StoreResult<Self> {
        config.validate()?;
        let timeout = config.timeout()?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            config,
            timeout,
            client,
        })
    }

    pub fn config(&self) -> &InfoClientConfig {
        &self.config
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/info/{}", self.config.endpoint.trim_end_matches('/'), collection)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            StoreAuth::None => request,
            StoreAuth::Bearer { token } => request.bearer_auth(token),
            StoreAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Transport(err.to_string())
        }
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }

    async fn backend_error(&self, response: Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        warn!(status, %message, "information service returned an error");
        StoreError::Backend { status, message }
    }
}

fn etag(response: &Response) -> Option<DocumentVersion> {
    response
        .headers()
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(DocumentVersion::new)
}

/// Unwraps `{"<collection>": {...}}`. A missing or null inner value is an
/// empty collection.
fn collection_entries(collection: &str, body: Value) -> StoreResult<Map<String, Value>> {
    let invalid = |reason: String| StoreError::InvalidDocument {
        collection: collection.to_string(),
        reason,
    };
    let Value::Object(mut top) = body else {
        return Err(invalid("response body is not an object".to_string()));
    };
    match top.remove(collection) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(entries)) => Ok(entries),
        Some(other) => Err(invalid(format!("collection value is not an object: {other}"))),
    }
}

#[async_trait]
impl DocumentStore for InfoClient {
    fn backend_name(&self) -> &'static str {
        "infoservice"
    }

    async fn get_document(&self, collection: &str) -> StoreResult<VersionedDocument> {
        let url = self.collection_url(collection);
        debug!(%url, "fetching collection");

        let response = self.send(self.client.get(&url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(StoreError::NotFound(collection.to_string())),
            status if !status.is_success() => return Err(self.backend_error(response).await),
            _ => {}
        }

        let version = etag(&response);
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let entries = collection_entries(collection, body)?;
        debug!(collection, entries = entries.len(), ?version, "fetched collection");
        Ok(VersionedDocument { entries, version })
    }

    async fn merge_document(
        &self,
        collection: &str,
        patch: Map<String, Value>,
        condition: WriteCondition,
    ) -> StoreResult<()> {
        let url = self.collection_url(collection);
        let mut body = Map::new();
        body.insert(collection.to_string(), Value::Object(patch));

        let mut request = self.client.put(&url).json(&body);
        request = match &condition {
            WriteCondition::Always => request,
            WriteCondition::IfVersion(version) => request.header(IF_MATCH, version.as_str()),
            WriteCondition::IfAbsent => request.header(IF_NONE_MATCH, "*"),
        };
        debug!(%url, ?condition, "merging into collection");

        let response = self.send(request).await?;
        match response.status() {
            StatusCode::PRECONDITION_FAILED | StatusCode::CONFLICT => {
                Err(StoreError::Conflict(collection.to_string()))
            }
            status if status.is_success() => Ok(()),
            _ => Err(self.backend_error(response).await),
        }
    }
}
