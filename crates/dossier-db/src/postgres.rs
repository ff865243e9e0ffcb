//! Postgres-backed document store
//!
//! Documents live in a single `documents` table keyed by (collection, id).
//! Writes notify the `dossier_documents` channel so other instances can refresh
//! their subscribers; the payload is `{instance}|{collection}`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dossier_core::CollectionPath;
use serde_json::Value;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

use crate::store::{assign_id, DocumentStore, StoreError, StoreResult};
use crate::subscription::{Subscription, SubscriptionHub};

const NOTIFY_CHANNEL: &str = "dossier_documents";
const LISTENER_RETRY_BASE: Duration = Duration::from_millis(250);
const LISTENER_RETRY_MAX: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    hub: Arc<SubscriptionHub>,
    instance_id: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hub: Arc::new(SubscriptionHub::new()),
            instance_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    async fn fetch_snapshot(&self, path: &CollectionPath) -> StoreResult<Vec<Value>> {
        let rows = sqlx::query_scalar::<Postgres, Json<Value>>(
            "SELECT data FROM documents WHERE collection = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(path.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(value)| value).collect())
    }

    /// Refresh local subscribers and tell other instances about the change.
    async fn changed(&self, path: &CollectionPath) {
        if self.hub.has_subscribers(path) {
            match self.fetch_snapshot(path).await {
                Ok(snapshot) => self.hub.publish(path, snapshot),
                Err(e) => tracing::warn!(error = %e, collection = %path, "Failed to refresh subscribers"),
            }
        }

        let payload = format!("{}|{}", self.instance_id, path);
        if let Err(e) = sqlx::query("SELECT pg_notify($1, $2)")
            .bind(NOTIFY_CHANNEL)
            .bind(payload)
            .execute(&self.pool)
            .await
        {
            tracing::warn!(error = %e, collection = %path, "Failed to send change notification");
        }
    }

    /// Listen for changes made by other instances and forward them to local subscribers.
    pub async fn spawn_listener(&self) -> StoreResult<tokio::task::JoinHandle<()>> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(NOTIFY_CHANNEL).await?;
        let store = self.clone();

        Ok(tokio::spawn(async move {
            let mut failures: u32 = 0;
            loop {
                let notification = match listener.recv().await {
                    Ok(notification) => {
                        failures = 0;
                        notification
                    }
                    Err(e) => {
                        failures = failures.saturating_add(1);
                        let Some(delay) = listener_retry_delay(store.pool.is_closed(), failures)
                        else {
                            tracing::info!("Database pool closed, stopping change listener");
                            break;
                        };
                        tracing::warn!(
                            error = %e,
                            failures = failures,
                            retry_in_ms = delay.as_millis() as u64,
                            "Document change listener error"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                };
                let Some(path) = parse_notification(notification.payload(), &store.instance_id)
                else {
                    continue;
                };
                if !store.hub.has_subscribers(&path) {
                    continue;
                }
                match store.fetch_snapshot(&path).await {
                    Ok(snapshot) => store.hub.publish(&path, snapshot),
                    Err(e) => {
                        tracing::warn!(error = %e, collection = %path, "Failed to refresh subscribers")
                    }
                }
            }
        }))
    }
}

/// Wait before the next `recv` after `failures` consecutive errors, doubling up
/// to a cap. `None` once the pool is closed, since the listener can never
/// recover.
fn listener_retry_delay(pool_closed: bool, failures: u32) -> Option<Duration> {
    if pool_closed {
        return None;
    }
    let exponent = failures.saturating_sub(1).min(16);
    Some(
        LISTENER_RETRY_BASE
            .saturating_mul(1u32 << exponent)
            .min(LISTENER_RETRY_MAX),
    )
}

/// Collection named by a notification from another instance.
fn parse_notification(payload: &str, own_instance: &str) -> Option<CollectionPath> {
    let (origin, collection) = payload.split_once('|')?;
    if origin == own_instance {
        return None;
    }
    parse_collection_path(collection)
}

fn parse_collection_path(raw: &str) -> Option<CollectionPath> {
    let segments: Vec<&str> = raw.split('/').collect();
    match segments.as_slice() {
        ["users", owner, "clients"] => Some(CollectionPath::clients(owner)),
        ["users", owner, "banners"] => Some(CollectionPath::banners(owner)),
        ["users", owner, "notifications"] => Some(CollectionPath::notifications(owner)),
        ["users", owner, "clients", client, "years"] => Some(CollectionPath::years(owner, client)),
        ["users", owner, "clients", client, "documents"] => {
            Some(CollectionPath::documents(owner, client))
        }
        ["users", owner, "clients", client, "generic_documents"] => {
            Some(CollectionPath::generic_documents(owner, client))
        }
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn get(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query_scalar::<Postgres, Json<Value>>(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(path.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(value)| value))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<Value>> {
        self.fetch_snapshot(path).await
    }

    #[tracing::instrument(skip(self, value), fields(db.table = "documents", db.operation = "insert"))]
    async fn create(
        &self,
        path: &CollectionPath,
        id: Option<&str>,
        mut value: Value,
    ) -> StoreResult<String> {
        let id = assign_id(id, &mut value);
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(path.as_str())
        .bind(&id)
        .bind(Json(&value))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict(path, &id));
        }

        self.changed(path).await;
        Ok(id)
    }

    #[tracing::instrument(skip(self, value), fields(db.table = "documents", db.operation = "update"))]
    async fn update(&self, path: &CollectionPath, id: &str, value: Value) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET data = $3, updated_at = now() WHERE collection = $1 AND id = $2",
        )
        .bind(path.as_str())
        .bind(id)
        .bind(Json(&value))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(path, id));
        }

        self.changed(path).await;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete"))]
    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(path.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(path, id));
        }

        self.changed(path).await;
        Ok(())
    }

    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        let rx = self.hub.receiver(path);
        let initial = self.fetch_snapshot(path).await?;
        Ok(Subscription::new(path.clone(), initial, rx))
    }
}
