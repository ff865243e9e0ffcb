//! Preview source resolution
//!
//! A [`FileReference`] may carry an inline payload, a direct URL, a storage
//! path, or any combination. Storage paths are turned into time-limited URLs
//! through a [`DownloadUrlResolver`]; bytes are pulled through a
//! [`ByteFetcher`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dossier_core::{DocumentRecord, InlinePayload};
use dossier_storage::Storage;

use crate::PreviewError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileReference {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub inline_payload: Option<InlinePayload>,
    pub url: Option<String>,
    pub storage_path: Option<String>,
}

impl From<&DocumentRecord> for FileReference {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            file_name: Some(record.file_name.clone()),
            content_type: record.content_type.clone(),
            inline_payload: record.inline_payload.clone(),
            url: record.url.clone(),
            storage_path: record.storage_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSource {
    Url(String),
    Inline(InlinePayload),
}

impl ResolvedSource {
    pub fn url(&self) -> Option<&str> {
        match self {
            ResolvedSource::Url(url) => Some(url),
            ResolvedSource::Inline(_) => None,
        }
    }

    /// Something an `<img>` or `<iframe>` can load.
    pub fn embeddable(&self, content_type: Option<&str>) -> String {
        match self {
            ResolvedSource::Url(url) => url.clone(),
            ResolvedSource::Inline(payload) => payload.data_url(content_type),
        }
    }
}

#[async_trait]
pub trait DownloadUrlResolver: Send + Sync {
    async fn resolve(&self, storage_path: &str) -> Result<String, PreviewError>;
}

pub struct StorageUrlResolver {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl StorageUrlResolver {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }
}

#[async_trait]
impl DownloadUrlResolver for StorageUrlResolver {
    async fn resolve(&self, storage_path: &str) -> Result<String, PreviewError> {
        self.storage
            .get_download_url(storage_path, self.ttl)
            .await
            .map_err(|e| PreviewError::Resolve(e.to_string()))
    }
}

#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PreviewError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, PreviewError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PreviewError::Fetch(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PreviewError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PreviewError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Fetch(format!("HTTP {}", status)));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| PreviewError::Fetch(e.to_string()))
    }
}
