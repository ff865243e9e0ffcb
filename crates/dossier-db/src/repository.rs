use std::marker::PhantomData;
use std::sync::Arc;

use dossier_core::{AppError, CollectionPath, Record};
use serde_json::Value;

use crate::store::{DocumentStore, StoreError};
use crate::subscription::Subscription;

/// Typed access to the collections holding one record kind.
pub struct CollectionRepository<T: Record> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for CollectionRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

fn decode<T: Record>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("Stored {} is malformed: {}", T::KIND, e)))
}

impl<T: Record> CollectionRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<T>, AppError> {
        self.store
            .get(path, id)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    /// Like [`get`](Self::get) but a missing record is `NotFound`.
    pub async fn find(&self, path: &CollectionPath, id: &str) -> Result<T, AppError> {
        self.get(path, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::KIND, id)))
    }

    pub async fn list(&self, path: &CollectionPath) -> Result<Vec<T>, AppError> {
        self.store
            .list(path)
            .await?
            .into_iter()
            .map(decode::<T>)
            .collect()
    }

    /// Insert a record. An empty id is replaced with a generated one.
    pub async fn insert(&self, path: &CollectionPath, mut record: T) -> Result<T, AppError> {
        if record.id().is_empty() {
            record.assign_id(uuid::Uuid::new_v4().to_string());
        }
        let value = serde_json::to_value(&record)?;
        match self.store.create(path, Some(record.id()), value).await {
            Ok(_) => Ok(record),
            Err(StoreError::Conflict { id, .. }) => Err(AppError::Duplicate(format!(
                "{} {} already exists",
                T::KIND,
                id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: &CollectionPath, record: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(record)?;
        self.store
            .update(path, record.id(), value)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { id, .. } => {
                    AppError::NotFound(format!("{} {} not found", T::KIND, id))
                }
                other => other.into(),
            })
    }

    pub async fn remove(&self, path: &CollectionPath, id: &str) -> Result<(), AppError> {
        self.store.delete(path, id).await.map_err(|e| match e {
            StoreError::NotFound { id, .. } => {
                AppError::NotFound(format!("{} {} not found", T::KIND, id))
            }
            other => other.into(),
        })
    }

    pub async fn subscribe(&self, path: &CollectionPath) -> Result<TypedSubscription<T>, AppError> {
        let inner = self.store.subscribe(path).await?;
        Ok(TypedSubscription {
            inner,
            _marker: PhantomData,
        })
    }
}

/// [`Subscription`] decoding each snapshot into records.
pub struct TypedSubscription<T: Record> {
    inner: Subscription,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> TypedSubscription<T> {
    pub fn path(&self) -> &CollectionPath {
        self.inner.path()
    }

    /// Next snapshot; `None` when the store is gone, `Some(Err)` when a record fails to decode.
    pub async fn next(&mut self) -> Option<Result<Vec<T>, AppError>> {
        let snapshot = self.inner.next().await?;
        Some(snapshot.into_iter().map(decode::<T>).collect())
    }

    pub fn unsubscribe(self) {
        self.inner.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDocumentStore;
    use chrono::Utc;
    use dossier_core::{Year, YearInput};

    fn repo() -> CollectionRepository<Year> {
        CollectionRepository::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn year(label: &str) -> Year {
        Year::new(
            "c1",
            YearInput {
                label: label.to_string(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_find_remove() {
        let repo = repo();
        let path = CollectionPath::years("u1", "c1");
        repo.insert(&path, year("2024")).await.unwrap();

        assert_eq!(repo.find(&path, "2024").await.unwrap().label, "2024");
        repo.remove(&path, "2024").await.unwrap();
        let err = repo.find(&path, "2024").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.starts_with("Year")));
    }

    #[tokio::test]
    async fn test_duplicate_insert_maps_to_duplicate() {
        let repo = repo();
        let path = CollectionPath::years("u1", "c1");
        repo.insert(&path, year("2024")).await.unwrap();
        let err = repo.insert(&path, year("2024")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_typed_subscription_decodes() {
        let repo = repo();
        let path = CollectionPath::years("u1", "c1");
        let mut sub = repo.subscribe(&path).await.unwrap();
        assert!(sub.next().await.unwrap().unwrap().is_empty());

        repo.insert(&path, year("2023")).await.unwrap();
        let years = sub.next().await.unwrap().unwrap();
        assert_eq!(years[0].label, "2023");
    }
}
