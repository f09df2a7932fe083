// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Document store collaborators for accepted contacts.

use crate::config::StorageConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Document store rejected write ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Could not encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Document store reply carried no document id")]
    MissingId,
}

/// A store that can create a document in a named collection.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create `record` in `collection`, returning the new document id.
    async fn create_document(&self, collection: &str, record: Value) -> Result<String, StorageError>;
}

/// In-process store for tests and embedding.
///
/// Never built from configuration: documents are kept for the life of the
/// process and nothing reads them back over HTTP.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents of `collection` in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<(String, Value)> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, collection: &str, record: Value) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), record));
        debug!(collection, id = %id, "Stored document in memory");
        Ok(id)
    }
}

/// Remote document store reached over HTTP.
///
/// Documents are POSTed to `{endpoint}/collections/{collection}/documents`
/// and the id is read from `$id` or `id` in the JSON reply.
pub struct HttpDocumentStore {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpDocumentStore {
    /// Create new document store client
    ///
    /// `client` should carry a request timeout; the handler awaits every
    /// write.
    pub fn new(endpoint: String, api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    fn documents_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/documents", self.endpoint, collection)
    }
}

#[async_trait::async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create_document(&self, collection: &str, record: Value) -> Result<String, StorageError> {
        let mut request = self
            .client
            .post(self.documents_url(collection))
            .json(&serde_json::json!({ "data": record }));
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let reply: Value = response.json().await?;
        document_id(&reply).ok_or(StorageError::MissingId)
    }
}

fn document_id(reply: &Value) -> Option<String> {
    ["$id", "id"]
        .iter()
        .find_map(|key| reply.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Build the store described by `config`.
///
/// Returns none when storage is disabled or no endpoint is set.
pub fn from_config(config: &StorageConfig) -> anyhow::Result<Option<Arc<dyn DocumentStore>>> {
    if !config.enabled {
        return Ok(None);
    }
    let Some(endpoint) = &config.endpoint else {
        warn!("STORAGE_ENDPOINT not set, accepted contacts will not be persisted");
        return Ok(None);
    };

    let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
    let store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(
        endpoint.clone(),
        config.api_key.clone(),
        client,
    ));
    Ok(Some(store))
}
