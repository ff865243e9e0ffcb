//! Upload validation for banner images and client documents.

use std::path::Path;

use dossier_core::{AppError, Config};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{what} must be {limit} or smaller (got {size} bytes)")]
    TooLarge {
        what: &'static str,
        limit: String,
        size: usize,
    },

    #[error("Banner image must be an image file (got {content_type})")]
    NotAnImage { content_type: String },

    #[error("{file_name}: only {allowed} files are allowed")]
    ExtensionNotAllowed { file_name: String, allowed: String },

    #[error("{0} is empty")]
    EmptyFile(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::NotAnImage { .. } | ValidationError::ExtensionNotAllowed { .. } => {
                AppError::UnsupportedFileType(err.to_string())
            }
            ValidationError::EmptyFile(_) => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A file the admin dropped onto an upload area, before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PendingFile {
    pub file_name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DropOutcome {
    pub accepted: Vec<PendingFile>,
    /// One message naming every rejected file, if any were rejected.
    pub rejection: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_banner_image_bytes: usize,
    max_upload_bytes: usize,
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_banner_image_bytes: usize,
        max_upload_bytes: usize,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            max_banner_image_bytes,
            max_upload_bytes,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_banner_image_bytes(),
            config.max_upload_bytes(),
            config.document_allowed_extensions().to_vec(),
        )
    }

    pub fn validate_banner_image(
        &self,
        content_type: Option<&str>,
        size: usize,
    ) -> Result<(), ValidationError> {
        let content_type = content_type.unwrap_or_default().trim().to_lowercase();
        if !content_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                content_type: if content_type.is_empty() {
                    "unknown type".to_string()
                } else {
                    content_type
                },
            });
        }
        if size > self.max_banner_image_bytes {
            return Err(ValidationError::TooLarge {
                what: "Banner image",
                limit: format_limit(self.max_banner_image_bytes),
                size,
            });
        }
        Ok(())
    }

    pub fn is_allowed_document(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }

    pub fn validate_document(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        if !self.is_allowed_document(&file.file_name) {
            return Err(ValidationError::ExtensionNotAllowed {
                file_name: file.file_name.clone(),
                allowed: self.allowed_list(),
            });
        }
        if file.data.is_empty() {
            return Err(ValidationError::EmptyFile(file.file_name.clone()));
        }
        if file.size() > self.max_upload_bytes {
            return Err(ValidationError::TooLarge {
                what: "Document",
                limit: format_limit(self.max_upload_bytes),
                size: file.size(),
            });
        }
        Ok(())
    }

    /// Split a dropped batch into accepted files and a combined rejection
    /// message. Rejected files never reach the pending list.
    pub fn filter_dropped_files(&self, files: Vec<PendingFile>) -> DropOutcome {
        let (accepted, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| self.is_allowed_document(&f.file_name));

        let rejection = (!rejected.is_empty()).then(|| {
            let names: Vec<&str> = rejected.iter().map(|f| f.file_name.as_str()).collect();
            format!(
                "Not allowed: {}. Only {} files can be uploaded.",
                names.join(", "),
                self.allowed_list()
            )
        });

        DropOutcome {
            accepted,
            rejection,
        }
    }

    fn allowed_list(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn format_limit(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}
