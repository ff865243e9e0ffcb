//! Multipart form reading shared by the upload handlers.

use std::collections::HashMap;

use axum::extract::Multipart;
use dossier_core::AppError;
use dossier_services::UploadedFile;

/// Text fields and the (single) file part of a submitted form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Checkbox-style boolean: `true`, `on` and `1` are set.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.text(name)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "on" | "1"))
    }

    pub fn require_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::InvalidInput("A file is required".to_string()))
    }
}

/// Read every part of `multipart`. The part named `file` is the upload;
/// every other part is a text field.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field
                .file_name()
                .map(String::from)
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| AppError::InvalidInput("Uploaded file has no name".to_string()))?;
            let content_type = field.content_type().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
