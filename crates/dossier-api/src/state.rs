//! Application state shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use dossier_core::Config;
use dossier_db::DocumentStore;
use dossier_preview::PreviewOrchestrator;
use dossier_services::{RecordServices, UploadValidator};
use dossier_storage::{Storage, UrlSigner};

use crate::auth::middleware::AuthState;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub services: RecordServices,
    pub store: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn Storage>,
    pub auth: Arc<AuthState>,
    pub preview: Arc<PreviewOrchestrator>,
    pub validator: UploadValidator,
    pub files: FileAccess,
}

/// Verification of signed `/files` links.
#[derive(Clone)]
pub struct FileAccess {
    pub signer: UrlSigner,
    pub url_ttl: Duration,
}
