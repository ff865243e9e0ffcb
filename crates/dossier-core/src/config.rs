//! Configuration module
//!
//! Environment-driven configuration for the admin service: server, session,
//! shared admin credential, document store, object storage and upload limits.

use std::env;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const SESSION_TTL_HOURS: i64 = 12;
const DOWNLOAD_URL_TTL_SECS: u64 = 3600;
const HTTP_CLIENT_TIMEOUT_SECS: u64 = 15;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
/// Banner images are capped at 5 MB.
pub const MAX_BANNER_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const MAX_INLINE_PAYLOAD_BYTES: usize = 512 * 1024;
pub const DEFAULT_DOCUMENT_EXTENSIONS: &str = "pdf,jpg,jpeg,png,doc,docx";

/// Server and session settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub environment: String,
    pub http_client_timeout_seconds: u64,
    /// Upper bound on requests served at once
    pub http_concurrency_limit: usize,
}

/// Admin console configuration
#[derive(Clone, Debug)]
pub struct DossierConfig {
    pub base: BaseConfig,
    // Shared admin credential
    pub admin_email: String,
    pub admin_password_hash: String,
    /// Postgres connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub file_url_secret: Option<String>,
    pub download_url_ttl_seconds: u64,
    // Upload limits
    pub max_banner_image_bytes: usize,
    pub max_upload_bytes: usize,
    pub max_inline_payload_bytes: usize,
    pub document_allowed_extensions: Vec<String>,
    pub realtime_mirror_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<DossierConfig>);

impl Config {
    fn as_dossier(&self) -> &DossierConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_dossier().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = DossierConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_dossier().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_dossier().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_dossier().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_dossier().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_dossier().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_dossier().base.jwt_secret
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.as_dossier().base.session_ttl_hours
    }

    pub fn environment(&self) -> &str {
        &self.as_dossier().base.environment
    }

    pub fn http_client_timeout_seconds(&self) -> u64 {
        self.as_dossier().base.http_client_timeout_seconds
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_dossier().base.http_concurrency_limit
    }

    pub fn admin_email(&self) -> &str {
        &self.as_dossier().admin_email
    }

    pub fn admin_password_hash(&self) -> &str {
        &self.as_dossier().admin_password_hash
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_dossier().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_dossier().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_dossier().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_dossier().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_dossier().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_dossier().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_dossier().local_storage_base_url.as_deref()
    }

    /// Key for signed local download URLs. Falls back to the session secret.
    pub fn file_url_secret(&self) -> &str {
        self.as_dossier()
            .file_url_secret
            .as_deref()
            .unwrap_or(self.as_dossier().base.jwt_secret.as_str())
    }

    pub fn download_url_ttl_seconds(&self) -> u64 {
        self.as_dossier().download_url_ttl_seconds
    }

    pub fn max_banner_image_bytes(&self) -> usize {
        self.as_dossier().max_banner_image_bytes
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.as_dossier().max_upload_bytes
    }

    pub fn max_inline_payload_bytes(&self) -> usize {
        self.as_dossier().max_inline_payload_bytes
    }

    pub fn document_allowed_extensions(&self) -> &[String] {
        &self.as_dossier().document_allowed_extensions
    }

    pub fn realtime_mirror_url(&self) -> Option<&str> {
        self.as_dossier().realtime_mirror_url.as_deref()
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma-separated extension list, dropping leading dots.
pub fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl DossierConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let admin_email = env::var("ADMIN_EMAIL")
            .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL must be set"))?;
        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH")
            .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD_HASH must be set"))?;

        let storage_backend = match optional_var("STORAGE_BACKEND") {
            Some(raw) => Some(raw.parse::<StorageBackend>()?),
            None => Some(StorageBackend::Local),
        };

        let base = BaseConfig {
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret,
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| SESSION_TTL_HOURS.to_string())
                .parse()
                .unwrap_or(SESSION_TTL_HOURS),
            environment,
            http_client_timeout_seconds: env::var("HTTP_CLIENT_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| HTTP_CLIENT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_CLIENT_TIMEOUT_SECS),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        Ok(DossierConfig {
            base,
            admin_email,
            admin_password_hash,
            database_url: optional_var("DATABASE_URL"),
            storage_backend,
            s3_bucket: optional_var("S3_BUCKET"),
            s3_region: optional_var("S3_REGION").or_else(|| optional_var("AWS_REGION")),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            local_storage_path: Some(
                env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./data/files".to_string()),
            ),
            local_storage_base_url: Some(
                env::var("LOCAL_STORAGE_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            ),
            file_url_secret: optional_var("FILE_URL_SECRET"),
            download_url_ttl_seconds: env::var("DOWNLOAD_URL_TTL_SECONDS")
                .unwrap_or_else(|_| DOWNLOAD_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(DOWNLOAD_URL_TTL_SECS),
            max_banner_image_bytes: env::var("MAX_BANNER_IMAGE_BYTES")
                .unwrap_or_else(|_| MAX_BANNER_IMAGE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_BANNER_IMAGE_BYTES),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| MAX_UPLOAD_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_UPLOAD_BYTES),
            max_inline_payload_bytes: env::var("MAX_INLINE_PAYLOAD_BYTES")
                .unwrap_or_else(|_| MAX_INLINE_PAYLOAD_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_INLINE_PAYLOAD_BYTES),
            document_allowed_extensions: parse_extension_list(
                &env::var("DOCUMENT_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_DOCUMENT_EXTENSIONS.to_string()),
            ),
            realtime_mirror_url: optional_var("REALTIME_MIRROR_URL"),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be at least 1"));
        }

        if !self.admin_email.contains('@') {
            return Err(anyhow::anyhow!("ADMIN_EMAIL must be an email address"));
        }

        if !self.admin_password_hash.starts_with("$argon2") {
            return Err(anyhow::anyhow!(
                "ADMIN_PASSWORD_HASH must be an argon2 PHC string"
            ));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        match self.storage_backend.unwrap_or(StorageBackend::Local) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for local storage"
                    ));
                }
            }
        }

        if self.max_banner_image_bytes == 0 || self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("Upload limits must be greater than zero"));
        }

        if self.document_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "DOCUMENT_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.download_url_ttl_seconds == 0 {
            return Err(anyhow::anyhow!(
                "DOWNLOAD_URL_TTL_SECONDS must be greater than zero"
            ));
        }

        Ok(())
    }
}
