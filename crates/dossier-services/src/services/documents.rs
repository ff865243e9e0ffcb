use std::sync::Arc;

use chrono::Utc;
use dossier_core::{AppError, Client, CollectionPath, DocumentRecord, DocumentUpdate, InlinePayload, Year};
use dossier_db::{BestEffortMirror, CollectionRepository, TypedSubscription};
use dossier_storage::{document_key, ObjectMetadata, Storage};
use uuid::Uuid;

use super::delete_file_best_effort;
use crate::screen::RecordScreen;
use crate::upload::{UploadValidator, UploadedFile};

/// Which of a client's two document collections an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentScope {
    /// Filed under a year folder
    Yearly,
    /// Not tied to any year, mirrored to the realtime database
    Generic,
}

impl DocumentScope {
    pub fn path(self, owner: &str, client_id: &str) -> CollectionPath {
        match self {
            DocumentScope::Yearly => CollectionPath::documents(owner, client_id),
            DocumentScope::Generic => CollectionPath::generic_documents(owner, client_id),
        }
    }

    fn key_segment(self) -> &'static str {
        match self {
            DocumentScope::Yearly => "documents",
            DocumentScope::Generic => "generic_documents",
        }
    }
}

/// Form submitted with a document upload.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Display name; defaults to the file name when blank
    pub name: Option<String>,
    pub year: Option<String>,
    pub file: UploadedFile,
}

#[derive(Clone)]
pub struct DocumentService {
    documents: CollectionRepository<DocumentRecord>,
    clients: CollectionRepository<Client>,
    years: CollectionRepository<Year>,
    storage: Arc<dyn Storage>,
    mirror: BestEffortMirror,
    validator: UploadValidator,
    max_inline_payload_bytes: usize,
}

impl DocumentService {
    pub fn new(
        documents: CollectionRepository<DocumentRecord>,
        clients: CollectionRepository<Client>,
        years: CollectionRepository<Year>,
        storage: Arc<dyn Storage>,
        mirror: BestEffortMirror,
        validator: UploadValidator,
        max_inline_payload_bytes: usize,
    ) -> Self {
        Self {
            documents,
            clients,
            years,
            storage,
            mirror,
            validator,
            max_inline_payload_bytes,
        }
    }

    pub async fn list(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
    ) -> Result<Vec<DocumentRecord>, AppError> {
        self.documents.list(&scope.path(owner, client_id)).await
    }

    pub async fn get(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
        id: &str,
    ) -> Result<DocumentRecord, AppError> {
        self.documents.find(&scope.path(owner, client_id), id).await
    }

    pub async fn subscribe(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
    ) -> Result<TypedSubscription<DocumentRecord>, AppError> {
        self.documents.subscribe(&scope.path(owner, client_id)).await
    }

    pub async fn screen(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
    ) -> Result<RecordScreen<DocumentRecord>, AppError> {
        RecordScreen::mount(self.documents.clone(), scope.path(owner, client_id)).await
    }

    /// Store the file, then create its record. Small files also keep an
    /// inline copy on the record.
    #[tracing::instrument(skip(self, input), fields(file_name = %input.file.file_name, size_bytes = input.file.size()))]
    pub async fn upload(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
        input: NewDocument,
    ) -> Result<DocumentRecord, AppError> {
        self.clients
            .find(&CollectionPath::clients(owner), client_id)
            .await?;
        self.validator.validate_document(&input.file)?;

        let year = match scope {
            DocumentScope::Yearly => {
                let year = input
                    .year
                    .as_deref()
                    .map(str::trim)
                    .filter(|y| !y.is_empty())
                    .ok_or_else(|| AppError::InvalidInput("Year is required".to_string()))?
                    .to_string();
                self.ensure_year(owner, client_id, &year).await?;
                Some(year)
            }
            DocumentScope::Generic => {
                if input.year.as_deref().is_some_and(|y| !y.trim().is_empty()) {
                    return Err(AppError::InvalidInput(
                        "Generic documents are not filed under a year".to_string(),
                    ));
                }
                None
            }
        };

        let file = input.file;
        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| file.file_name.clone());
        let content_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| dossier_storage::content_type_for_key(&file.file_name).to_string());

        let id = Uuid::new_v4().to_string();
        let key = document_key(owner, client_id, scope.key_segment(), &id, &file.file_name);
        let file_size = file.size() as u64;
        let inline_payload = (file.size() <= self.max_inline_payload_bytes)
            .then(|| InlinePayload::encode(&file.data));

        let metadata = ObjectMetadata::new(content_type.clone()).with_file_name(file.file_name.clone());
        let stored = self.storage.upload(&key, file.data, &metadata).await?;

        let now = Utc::now();
        let record = DocumentRecord {
            id,
            client_id: client_id.to_string(),
            name,
            file_name: file.file_name,
            year,
            content_type: Some(content_type),
            file_size,
            inline_payload,
            storage_path: Some(stored.key.clone()),
            url: Some(stored.url),
            created_at: now,
            updated_at: now,
        };

        let path = scope.path(owner, client_id);
        let record = match self.documents.insert(&path, record).await {
            Ok(record) => record,
            Err(e) => {
                delete_file_best_effort(&self.storage, &stored.key).await;
                return Err(e);
            }
        };

        if scope == DocumentScope::Generic {
            self.mirror_set(&path, &record).await;
        }

        tracing::info!(document_id = %record.id, key = %stored.key, "Document uploaded");
        Ok(record)
    }

    #[tracing::instrument(skip(self, update))]
    pub async fn update(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
        id: &str,
        update: DocumentUpdate,
    ) -> Result<DocumentRecord, AppError> {
        let path = scope.path(owner, client_id);
        let mut record = self.documents.find(&path, id).await?;
        update.apply(&mut record, Utc::now())?;
        if let Some(year) = record.year.clone() {
            self.ensure_year(owner, client_id, &year).await?;
        }
        self.documents.save(&path, &record).await?;

        if scope == DocumentScope::Generic {
            self.mirror_set(&path, &record).await;
        }
        Ok(record)
    }

    /// Remove the record, then its file. A failed file delete is only logged.
    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
        id: &str,
    ) -> Result<(), AppError> {
        let path = scope.path(owner, client_id);
        let record = self.documents.find(&path, id).await?;
        self.remove_record(&path, scope, record).await
    }

    /// Delete every document in `scope`, or only those filed under `year`.
    pub(crate) async fn purge(
        &self,
        owner: &str,
        client_id: &str,
        scope: DocumentScope,
        year: Option<&str>,
    ) -> Result<usize, AppError> {
        let path = scope.path(owner, client_id);
        let records: Vec<DocumentRecord> = self
            .documents
            .list(&path)
            .await?
            .into_iter()
            .filter(|r| year.is_none() || r.year.as_deref() == year)
            .collect();

        let count = records.len();
        for record in records {
            self.remove_record(&path, scope, record).await?;
        }
        Ok(count)
    }

    async fn remove_record(
        &self,
        path: &CollectionPath,
        scope: DocumentScope,
        record: DocumentRecord,
    ) -> Result<(), AppError> {
        self.documents.remove(path, &record.id).await?;
        if let Some(key) = record.storage_path.as_deref() {
            delete_file_best_effort(&self.storage, key).await;
        }
        if scope == DocumentScope::Generic {
            self.mirror.remove(&path.record(&record.id)).await;
        }
        tracing::info!(document_id = %record.id, "Document deleted");
        Ok(())
    }

    async fn ensure_year(&self, owner: &str, client_id: &str, label: &str) -> Result<(), AppError> {
        let path = CollectionPath::years(owner, client_id);
        if self.years.get(&path, label).await?.is_some() {
            return Ok(());
        }
        let year = Year::new(
            client_id,
            dossier_core::YearInput {
                label: label.to_string(),
            },
            Utc::now(),
        )?;
        match self.years.insert(&path, year).await {
            Ok(_) | Err(AppError::Duplicate(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn mirror_set(&self, path: &CollectionPath, record: &DocumentRecord) {
        // The mirror only needs the listing fields, not the inline copy.
        let mut mirrored = record.clone();
        mirrored.inline_payload = None;
        match serde_json::to_value(&mirrored) {
            Ok(value) => self.mirror.set(&path.record(&record.id), &value).await,
            Err(e) => tracing::warn!(error = %e, "Failed to encode document for mirror"),
        }
    }
}
