//! Dossier Services Layer
//!
//! Record management for the admin console: clients, year folders, yearly
//! and generic documents, banners and notifications. Also hosts upload
//! validation, live list screens and the admin auth/session registry. HTTP
//! concerns stay in dossier-api.

pub mod auth;
pub mod screen;
pub mod services;
pub mod upload;

pub use auth::{
    hash_password, AdminIdentity, AdminSession, AuthProvider, CredentialAuthProvider,
    SessionRegistry,
};
pub use screen::RecordScreen;
pub use services::banners::BannerService;
pub use services::clients::ClientService;
pub use services::dashboard::{summarize, DashboardSummary};
pub use services::documents::{DocumentScope, DocumentService, NewDocument};
pub use services::notifications::NotificationService;
pub use services::years::YearService;
pub use services::RecordServices;
pub use upload::{DropOutcome, PendingFile, UploadValidator, UploadedFile, ValidationError};
