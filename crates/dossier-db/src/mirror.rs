//! Secondary realtime mirror for generic documents
//!
//! The mirror is a best-effort copy kept alongside the primary store. Callers
//! go through [`BestEffortMirror`], whose operations return `()`: a mirror
//! failure is logged and can never change the outcome of the primary write.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Mirror request failed: {0}")]
    Request(String),
    #[error("Mirror returned status {0}")]
    Status(u16),
}

/// Real-time database collaborator: `set(path, value)` and `remove(path)`.
#[async_trait]
pub trait RealtimeMirror: Send + Sync {
    async fn set(&self, path: &str, value: &Value) -> Result<(), MirrorError>;

    async fn remove(&self, path: &str) -> Result<(), MirrorError>;
}

/// Mirror speaking the REST dialect of hosted realtime databases:
/// `PUT {base}/{path}.json` and `DELETE {base}/{path}.json`.
pub struct RestRealtimeMirror {
    client: reqwest::Client,
    base_url: String,
}

impl RestRealtimeMirror {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MirrorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MirrorError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }
}

#[async_trait]
impl RealtimeMirror for RestRealtimeMirror {
    async fn set(&self, path: &str, value: &Value) -> Result<(), MirrorError> {
        let response = self
            .client
            .put(self.url(path))
            .json(value)
            .send()
            .await
            .map_err(|e| MirrorError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(MirrorError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), MirrorError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| MirrorError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(MirrorError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Mirror used when none is configured.
pub struct NoopRealtimeMirror;

#[async_trait]
impl RealtimeMirror for NoopRealtimeMirror {
    async fn set(&self, _path: &str, _value: &Value) -> Result<(), MirrorError> {
        Ok(())
    }

    async fn remove(&self, _path: &str) -> Result<(), MirrorError> {
        Ok(())
    }
}

/// Best-effort secondary write. Failures are logged at `warn` and swallowed.
#[derive(Clone)]
pub struct BestEffortMirror {
    inner: Arc<dyn RealtimeMirror>,
}

impl BestEffortMirror {
    pub fn new(inner: Arc<dyn RealtimeMirror>) -> Self {
        Self { inner }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopRealtimeMirror))
    }

    pub async fn set(&self, path: &str, value: &Value) {
        if let Err(e) = self.inner.set(path, value).await {
            tracing::warn!(error = %e, mirror_path = %path, "Realtime mirror write failed");
        }
    }

    pub async fn remove(&self, path: &str) {
        if let Err(e) = self.inner.remove(path).await {
            tracing::warn!(error = %e, mirror_path = %path, "Realtime mirror remove failed");
        }
    }
}
