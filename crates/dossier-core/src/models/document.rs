use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{optional_text, Record};
use crate::AppError;

/// Size-capped copy of a file kept beside its record, base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InlinePayload {
    pub data: String,
}

impl InlinePayload {
    pub fn encode(bytes: &[u8]) -> Self {
        InlinePayload {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, AppError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| AppError::InvalidInput(format!("Inline payload is not valid base64: {}", e)))
    }

    /// Render as a `data:` URL for direct embedding.
    pub fn data_url(&self, content_type: Option<&str>) -> String {
        format!(
            "data:{};base64,{}",
            content_type.unwrap_or("application/octet-stream"),
            self.data
        )
    }
}

/// A stored file belonging to a client: either filed under a year or generic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentRecord {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub file_name: String,
    /// Absent for generic documents
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    pub file_size: u64,
    #[serde(default)]
    pub inline_payload: Option<InlinePayload>,
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for DocumentRecord {
    const KIND: &'static str = "Document";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

impl DocumentRecord {
    pub fn is_generic(&self) -> bool {
        self.year.is_none()
    }

    /// True when at least one preview source is recorded.
    pub fn has_source(&self) -> bool {
        self.inline_payload.is_some() || self.storage_path.is_some() || self.url.is_some()
    }
}

/// Edit form for an existing document. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DocumentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl DocumentUpdate {
    pub fn apply(self, record: &mut DocumentRecord, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(name) = self.name {
            record.name = super::required_text("Document name", &name)?;
        }
        if let Some(year) = self.year {
            if record.is_generic() {
                return Err(AppError::InvalidInput(
                    "Generic documents are not filed under a year".to_string(),
                ));
            }
            record.year = Some(
                optional_text(Some(year))
                    .ok_or_else(|| AppError::InvalidInput("Year is required".to_string()))?,
            );
        }
        record.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Option<&str>) -> DocumentRecord {
        let now = Utc::now();
        DocumentRecord {
            id: "d1".into(),
            client_id: "c1".into(),
            name: "Invoice".into(),
            file_name: "invoice.pdf".into(),
            year: year.map(String::from),
            content_type: Some("application/pdf".into()),
            file_size: 3,
            inline_payload: None,
            storage_path: None,
            url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_inline_payload_data_url() {
        let payload = InlinePayload::encode(b"abc");
        assert_eq!(payload.decode().unwrap(), b"abc");
        assert_eq!(payload.data_url(Some("text/plain")), "data:text/plain;base64,YWJj");
    }

    #[test]
    fn test_update_rejects_blank_year() {
        let mut doc = record(Some("2023"));
        let update = DocumentUpdate {
            name: None,
            year: Some("  ".into()),
        };
        assert!(update.apply(&mut doc, Utc::now()).is_err());
    }

    #[test]
    fn test_generic_document_cannot_gain_year() {
        let mut doc = record(None);
        let update = DocumentUpdate {
            name: None,
            year: Some("2024".into()),
        };
        assert!(update.apply(&mut doc, Utc::now()).is_err());
    }

    #[test]
    fn test_has_source() {
        let mut doc = record(None);
        assert!(!doc.has_source());
        doc.storage_path = Some("documents/x".into());
        assert!(doc.has_source());
    }
}
