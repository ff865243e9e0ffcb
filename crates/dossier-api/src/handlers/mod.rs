pub mod auth;
pub mod banners;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod files;
pub mod generic_documents;
pub mod multipart;
pub mod notifications;
pub mod pages;
pub mod stream;
pub mod uploads;
pub mod years;

use dossier_core::AppError;
use serde::Deserialize;
use utoipa::IntoParams;

/// Deletes only go through when the admin confirmed them.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl DeleteQuery {
    pub fn require_confirmation(&self, what: &str) -> Result<(), AppError> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Deleting this {} must be confirmed with confirm=true",
                what
            )))
        }
    }
}
