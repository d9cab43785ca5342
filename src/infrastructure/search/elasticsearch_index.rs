use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::application::ports::{BulkItemFailure, BulkOutcome, SearchIndex, SearchIndexError};
use crate::domain::IndexDocument;

/// Elasticsearch index spoken to over its REST API.
pub struct ElasticsearchIndex {
    client: reqwest::Client,
    host: String,
    index_name: String,
    username: String,
    password: Option<SecretString>,
}

impl ElasticsearchIndex {
    pub fn new(
        host: &str,
        index_name: impl Into<String>,
        username: impl Into<String>,
        password: Option<SecretString>,
        verify_certs: bool,
    ) -> Result<Self, SearchIndexError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_certs)
            .build()
            .map_err(|e| SearchIndexError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            index_name: index_name.into(),
            username: username.into(),
            password,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}/{}", self.host, path));
        match &self.password {
            Some(password) => {
                request.basic_auth(&self.username, Some(password.expose_secret()))
            }
            None => request,
        }
    }
}

fn transport_error(e: reqwest::Error) -> SearchIndexError {
    SearchIndexError::Unreachable(e.to_string())
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

#[derive(Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
struct BulkItem {
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

fn error_reason(error: &Value) -> String {
    match error {
        Value::Object(map) => {
            let kind = map.get("type").and_then(Value::as_str).unwrap_or("error");
            match map.get("reason").and_then(Value::as_str) {
                Some(reason) => format!("{}: {}", kind, reason),
                None => kind.to_string(),
            }
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    #[instrument(skip(self), fields(index = %self.index_name))]
    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .request(reqwest::Method::HEAD, &self.index_name)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status if is_auth_failure(status) => {
                Err(SearchIndexError::Unauthorized(status.to_string()))
            }
            status => Err(SearchIndexError::Unreachable(format!(
                "unexpected status {} checking index",
                status
            ))),
        }
    }

    #[instrument(skip(self), fields(index = %self.index_name))]
    async fn create_index(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .request(reqwest::Method::PUT, &self.index_name)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            info!(index = %self.index_name, "index_created");
            return Ok(true);
        }
        if is_auth_failure(status) {
            return Err(SearchIndexError::Unauthorized(status.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            info!(index = %self.index_name, "index already exists");
            return Ok(false);
        }

        Err(SearchIndexError::IndexCreationFailed(format!(
            "status {}: {}",
            status, body
        )))
    }

    #[instrument(skip(self, documents), fields(index = %self.index_name, count = documents.len()))]
    async fn bulk_insert(
        &self,
        documents: &[IndexDocument],
    ) -> Result<BulkOutcome, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BulkOutcome::default());
        }

        let action = json!({ "index": { "_index": self.index_name } }).to_string();
        let mut body = String::new();
        for document in documents {
            let source = serde_json::to_string(document)
                .map_err(|e| SearchIndexError::BulkWriteFailed(e.to_string()))?;
            body.push_str(&action);
            body.push('\n');
            body.push_str(&source);
            body.push('\n');
        }

        let response = self
            .request(reqwest::Method::POST, "_bulk")
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if is_auth_failure(status) {
            return Err(SearchIndexError::Unauthorized(status.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::BulkWriteFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: BulkResponse = response
            .json()
            .await
            .map_err(|e| SearchIndexError::BulkWriteFailed(format!("parse response: {}", e)))?;

        if !parsed.errors {
            return Ok(BulkOutcome {
                succeeded: documents.len(),
                failures: Vec::new(),
            });
        }

        let mut failures = Vec::new();
        for (position, entry) in parsed.items.into_iter().enumerate() {
            let Some(item) = entry.into_iter().next().map(|(_, v)| v) else {
                continue;
            };
            let item: BulkItem = match serde_json::from_value(item) {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!(position, error = %e, "Unreadable bulk item");
                    failures.push(BulkItemFailure {
                        position,
                        status: 0,
                        reason: format!("unreadable bulk item: {}", e),
                    });
                    continue;
                }
            };
            if let Some(error) = item.error.as_ref().filter(|_| item.status >= 300) {
                failures.push(BulkItemFailure {
                    position,
                    status: item.status,
                    reason: error_reason(error),
                });
            }
        }

        Ok(BulkOutcome {
            succeeded: documents.len().saturating_sub(failures.len()),
            failures,
        })
    }
}
