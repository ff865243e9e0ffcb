//! Service wiring: record services, preview, auth and signed file access.

use crate::auth::{AuthState, SessionTokens};
use crate::state::{AppState, FileAccess};
use anyhow::{Context, Result};
use dossier_core::Config;
use dossier_db::{BestEffortMirror, DocumentStore, RestRealtimeMirror};
use dossier_preview::{HttpFetcher, PreviewOrchestrator, StorageUrlResolver};
use dossier_services::{CredentialAuthProvider, RecordServices, SessionRegistry, UploadValidator};
use dossier_storage::{Storage, UrlSigner};
use std::sync::Arc;
use std::time::Duration;

pub fn initialize_services(
    config: &Config,
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let http_timeout = Duration::from_secs(config.http_client_timeout_seconds());
    let url_ttl = Duration::from_secs(config.download_url_ttl_seconds());

    let mirror = match config.realtime_mirror_url() {
        Some(url) => {
            let mirror = RestRealtimeMirror::new(url, http_timeout)
                .context("Failed to build realtime mirror client")?;
            tracing::info!(url = %url, "Realtime mirror enabled");
            BestEffortMirror::new(Arc::new(mirror))
        }
        None => BestEffortMirror::disabled(),
    };

    let validator = UploadValidator::from_config(config);
    let services = RecordServices::new(
        store.clone(),
        storage.clone(),
        mirror,
        validator.clone(),
        config.max_inline_payload_bytes(),
    );

    let fetcher = HttpFetcher::new(http_timeout).context("Failed to build preview fetcher")?;
    let preview = PreviewOrchestrator::new(
        Arc::new(StorageUrlResolver::new(storage.clone(), url_ttl)),
        Arc::new(fetcher),
    );

    let auth = AuthState {
        provider: Arc::new(CredentialAuthProvider::from_config(config)),
        sessions: Arc::new(SessionRegistry::new(chrono::Duration::hours(
            config.session_ttl_hours(),
        ))),
        tokens: SessionTokens::new(config.jwt_secret()),
        secure_cookie: config.is_production(),
    };

    tracing::info!(
        session_ttl_hours = config.session_ttl_hours(),
        max_upload_bytes = config.max_upload_bytes(),
        max_banner_image_bytes = config.max_banner_image_bytes(),
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        services,
        store,
        storage,
        auth: Arc::new(auth),
        preview: Arc::new(preview),
        validator,
        files: FileAccess {
            signer: UrlSigner::new(config.file_url_secret()),
            url_ttl,
        },
    }))
}
