//! Live list screens
//!
//! A [`RecordScreen`] holds the rows shown by one list page. It is fed by a
//! store subscription and re-fetches to reconcile when a pushed update fails.
//! Optimistic row edits belong to the browser console, which receives the
//! reconciled rows as the next snapshot. Dropping the screen releases its
//! subscription.

use dossier_core::{AppError, CollectionPath, Record};
use dossier_db::{CollectionRepository, TypedSubscription};

pub struct RecordScreen<T: Record> {
    path: CollectionPath,
    repository: CollectionRepository<T>,
    subscription: Option<TypedSubscription<T>>,
    items: Vec<T>,
}

impl<T: Record> RecordScreen<T> {
    /// Subscribe to `path` and load the initial snapshot.
    pub async fn mount(
        repository: CollectionRepository<T>,
        path: CollectionPath,
    ) -> Result<Self, AppError> {
        let mut subscription = repository.subscribe(&path).await?;
        let items = match subscription.next().await {
            Some(snapshot) => snapshot?,
            None => Vec::new(),
        };
        tracing::debug!(path = %path, rows = items.len(), "Screen mounted");
        Ok(Self {
            path,
            repository,
            subscription: Some(subscription),
            items,
        })
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the local rows with a fresh read from the store.
    pub async fn reconcile(&mut self) -> Result<(), AppError> {
        self.items = self.repository.list(&self.path).await?;
        Ok(())
    }

    /// Wait for the next pushed snapshot and adopt it. `None` once unmounted
    /// or when the store has gone away.
    pub async fn next_update(&mut self) -> Option<Result<&[T], AppError>> {
        let subscription = self.subscription.as_mut()?;
        match subscription.next().await? {
            Ok(items) => {
                self.items = items;
                Some(Ok(&self.items))
            }
            Err(e) => Some(Err(e)),
        }
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!(path = %self.path, "Screen unmounted");
        }
    }
}
