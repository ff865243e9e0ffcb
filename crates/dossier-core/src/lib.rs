//! Dossier Core Library
//!
//! Domain models, error types and configuration shared by every dossier crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::{BaseConfig, Config, DossierConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    derive_banner_key, Banner, BannerInput, BannerUpdate, Client, ClientInput, CollectionPath,
    DocumentRecord, DocumentUpdate, InlinePayload, Notification, NotificationAudience,
    NotificationInput, Record, Year, YearInput,
};
pub use storage_types::StorageBackend;
