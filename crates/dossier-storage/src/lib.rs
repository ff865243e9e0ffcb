//! Dossier Storage Library
//!
//! Object storage for uploaded documents and banner images. Provides the
//! [`Storage`] trait with S3 and local filesystem implementations.
//!
//! # Storage key format
//!
//! Keys mirror the owning record's collection path so files can be traced back
//! to their record:
//!
//! - **Documents**: `users/{owner}/clients/{client}/documents/{document}/{filename}`
//! - **Generic documents**: `users/{owner}/clients/{client}/generic_documents/{document}/{filename}`
//! - **Banners**: `users/{owner}/banners/{banner}/{filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! `keys` module so every backend stays consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signing;
pub mod traits;

pub use dossier_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{banner_key, content_type_for_key, document_key, sanitize_file_name};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use signing::{SignatureError, SignedQuery, UrlSigner};
pub use traits::{ObjectMetadata, Storage, StorageError, StorageResult, StoredObject};
