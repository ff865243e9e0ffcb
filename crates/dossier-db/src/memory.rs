use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dossier_core::CollectionPath;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::store::{assign_id, DocumentStore, StoreError, StoreResult};
use crate::subscription::{Subscription, SubscriptionHub};

struct Entry {
    seq: u64,
    value: Value,
}

#[derive(Default)]
struct Collections {
    next_seq: u64,
    by_path: HashMap<CollectionPath, HashMap<String, Entry>>,
}

impl Collections {
    fn snapshot(&self, path: &CollectionPath) -> Vec<Value> {
        let Some(entries) = self.by_path.get(path) else {
            return Vec::new();
        };
        let mut ordered: Vec<(&String, &Entry)> = entries.iter().collect();
        ordered.sort_by(|a, b| a.1.seq.cmp(&b.1.seq).then_with(|| a.0.cmp(b.0)));
        ordered.into_iter().map(|(_, e)| e.value.clone()).collect()
    }
}

/// In-process document store, used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
    hub: Arc<SubscriptionHub>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, path: &CollectionPath, collections: &Collections) {
        if self.hub.has_subscribers(path) {
            self.hub.publish(path, collections.snapshot(path));
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .by_path
            .get(path)
            .and_then(|entries| entries.get(id))
            .map(|entry| entry.value.clone()))
    }

    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<Value>> {
        Ok(self.collections.read().await.snapshot(path))
    }

    async fn create(
        &self,
        path: &CollectionPath,
        id: Option<&str>,
        mut value: Value,
    ) -> StoreResult<String> {
        let id = assign_id(id, &mut value);
        let mut collections = self.collections.write().await;
        let seq = collections.next_seq;
        let entries = collections.by_path.entry(path.clone()).or_default();
        if entries.contains_key(&id) {
            return Err(StoreError::conflict(path, &id));
        }
        entries.insert(id.clone(), Entry { seq, value });
        collections.next_seq += 1;
        self.publish(path, &collections);
        Ok(id)
    }

    async fn update(&self, path: &CollectionPath, id: &str, value: Value) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .by_path
            .get_mut(path)
            .and_then(|entries| entries.get_mut(id))
            .ok_or_else(|| StoreError::not_found(path, id))?;
        entry.value = value;
        self.publish(path, &collections);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .by_path
            .get_mut(path)
            .and_then(|entries| entries.remove(id))
            .ok_or_else(|| StoreError::not_found(path, id))?;
        self.publish(path, &collections);
        Ok(())
    }

    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        // Register before reading so a write between the two is not missed.
        let rx = self.hub.receiver(path);
        let initial = self.collections.read().await.snapshot(path);
        Ok(Subscription::new(path.clone(), initial, rx))
    }
}
