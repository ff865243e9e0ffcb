//! Record services
//!
//! One service per record kind. Every service takes the signed-in admin's
//! uid as `owner` so all collections stay scoped to that admin.

pub mod banners;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod notifications;
pub mod years;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use dossier_db::{BestEffortMirror, CollectionRepository, DocumentStore};
use dossier_storage::Storage;

use crate::upload::UploadValidator;
use banners::BannerService;
use clients::ClientService;
use documents::DocumentService;
use notifications::NotificationService;
use years::YearService;

/// Every record service wired over one store and one storage backend.
#[derive(Clone)]
pub struct RecordServices {
    pub clients: ClientService,
    pub years: YearService,
    pub documents: DocumentService,
    pub banners: BannerService,
    pub notifications: NotificationService,
}

impl RecordServices {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn Storage>,
        mirror: BestEffortMirror,
        validator: UploadValidator,
        max_inline_payload_bytes: usize,
    ) -> Self {
        let documents = DocumentService::new(
            CollectionRepository::new(store.clone()),
            CollectionRepository::new(store.clone()),
            CollectionRepository::new(store.clone()),
            storage.clone(),
            mirror,
            validator.clone(),
            max_inline_payload_bytes,
        );
        let years = YearService::new(
            CollectionRepository::new(store.clone()),
            CollectionRepository::new(store.clone()),
            documents.clone(),
        );
        let clients = ClientService::new(
            CollectionRepository::new(store.clone()),
            years.clone(),
            documents.clone(),
        );
        let banners = BannerService::new(CollectionRepository::new(store.clone()), storage, validator);
        let notifications = NotificationService::new(CollectionRepository::new(store));

        Self {
            clients,
            years,
            documents,
            banners,
            notifications,
        }
    }
}

/// Delete a stored file, logging instead of failing. Used after the owning
/// record is already gone.
pub(crate) async fn delete_file_best_effort(storage: &Arc<dyn Storage>, key: &str) {
    match storage.delete(key).await {
        Ok(()) => tracing::debug!(key = %key, "Stored file deleted"),
        Err(e) => tracing::warn!(key = %key, error = %e, "Failed to delete stored file"),
    }
}
