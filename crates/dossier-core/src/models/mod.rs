pub mod banner;
pub mod client;
pub mod document;
pub mod notification;
pub mod path;
pub mod year;

pub use banner::{derive_banner_key, Banner, BannerInput, BannerUpdate};
pub use client::{Client, ClientInput};
pub use document::{DocumentRecord, DocumentUpdate, InlinePayload};
pub use notification::{Notification, NotificationAudience, NotificationInput};
pub use path::CollectionPath;
pub use year::{Year, YearInput};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A persisted entity keyed by an identifier within a collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular human-readable name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn assign_id(&mut self, id: String);
}

/// Trim a required text field, rejecting blank input.
pub fn required_text(field: &str, value: &str) -> Result<String, crate::AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Normalize optional text: blank strings become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
