use async_trait::async_trait;
use dossier_core::{AppError, CollectionPath};
use serde_json::Value;
use thiserror::Error;

use crate::subscription::Subscription;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("{collection}/{id} already exists")]
    Conflict { collection: String, id: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(path: &CollectionPath, id: &str) -> Self {
        StoreError::NotFound {
            collection: path.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(path: &CollectionPath, id: &str) -> Self {
        StoreError::Conflict {
            collection: path.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => AppError::NotFound(format!("Record {} not found", id)),
            StoreError::Conflict { id, .. } => {
                AppError::Duplicate(format!("Record {} already exists", id))
            }
            StoreError::Serialization(msg) => AppError::Internal(msg),
            StoreError::Backend(msg) => AppError::Database(msg),
        }
    }
}

/// Document database collaborator.
///
/// Each write is a single independent operation; concurrent writers to the
/// same record resolve as last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Value>>;

    /// All documents in creation order
    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<Value>>;

    /// Insert a document. With `id = None` an id is generated and written to
    /// the document's `id` field. Fails with `Conflict` if the id is taken.
    async fn create(
        &self,
        path: &CollectionPath,
        id: Option<&str>,
        value: Value,
    ) -> StoreResult<String>;

    /// Replace an existing document. Fails with `NotFound` if it is missing.
    async fn update(&self, path: &CollectionPath, id: &str, value: Value) -> StoreResult<()>;

    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()>;

    /// Open a live subscription. The first item is the current snapshot.
    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<Subscription>;
}

/// Id for a new document, writing it into the JSON object when generated.
pub(crate) fn assign_id(id: Option<&str>, value: &mut Value) -> String {
    let id = match id {
        Some(id) => id.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };
    if let Value::Object(map) = value {
        map.insert("id".to_string(), Value::String(id.clone()));
    }
    id
}
