//! Test helpers: build AppState and router for integration tests.
//!
//! Every test app runs over the in-memory document store and a local storage
//! backend rooted in a fresh temp directory.

pub mod fixtures;

use axum_test::TestServer;
use dossier_api::constants;
use dossier_api::setup::{routes, services};
use dossier_core::config::{parse_extension_list, DEFAULT_DOCUMENT_EXTENSIONS};
use dossier_core::{BaseConfig, Config, DossierConfig, StorageBackend};
use dossier_db::MemoryDocumentStore;
use dossier_services::hash_password;
use dossier_storage::{LocalStorage, Storage, UrlSigner};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const TEST_FILE_BASE_URL: &str = "http://localhost:3000/files";

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(storage_dir: &str) -> Config {
    Config(Box::new(DossierConfig {
        base: BaseConfig {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 30,
            jwt_secret: "test-secret-key-min-32-characters-long".to_string(),
            session_ttl_hours: 12,
            environment: "test".to_string(),
            http_client_timeout_seconds: 5,
            http_concurrency_limit: 64,
        },
        admin_email: TEST_ADMIN_EMAIL.to_string(),
        admin_password_hash: hash_password(TEST_ADMIN_PASSWORD)
            .expect("Failed to hash test password"),
        database_url: None,
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: Some(storage_dir.to_string()),
        local_storage_base_url: Some(TEST_FILE_BASE_URL.to_string()),
        file_url_secret: None,
        download_url_ttl_seconds: 3600,
        max_banner_image_bytes: 5 * 1024 * 1024,
        max_upload_bytes: 8 * 1024 * 1024,
        max_inline_payload_bytes: 64 * 1024,
        document_allowed_extensions: parse_extension_list(DEFAULT_DOCUMENT_EXTENSIONS),
        realtime_mirror_url: None,
    }))
}

/// Setup test app with an in-memory store and temp-dir local storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_dir = temp_dir.path().to_string_lossy().to_string();
    let config = create_test_config(&storage_dir);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path().to_path_buf(), TEST_FILE_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage")
            .with_signer(UrlSigner::new(config.file_url_secret())),
    );
    let store = Arc::new(MemoryDocumentStore::new());

    let state = services::initialize_services(&config, store, storage)
        .expect("Failed to initialize services");
    let router = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}

/// Sign in as the shared admin; returns the session token.
pub async fn login(client: &TestServer) -> String {
    let response = client
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200);
    response.json::<Value>()["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Create a client record; returns its id.
pub async fn create_client(client: &TestServer, token: &str, name: &str) -> String {
    let response = client
        .post(&api_path("/clients"))
        .add_header("Authorization", bearer(token))
        .json(&json!({ "name": name, "email": "client@example.com" }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json::<Value>()["id"]
        .as_str()
        .expect("client has an id")
        .to_string()
}

/// Path part of a local storage URL, for requesting it from the test server.
pub fn local_path(url: &str) -> String {
    url.strip_prefix("http://localhost:3000")
        .unwrap_or(url)
        .to_string()
}
