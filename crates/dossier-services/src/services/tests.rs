use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dossier_core::config::{parse_extension_list, DEFAULT_DOCUMENT_EXTENSIONS, MAX_BANNER_IMAGE_BYTES};
use dossier_core::{
    AppError, BannerInput, BannerUpdate, ClientInput, CollectionPath, DocumentRecord,
    DocumentUpdate, StorageBackend, YearInput,
};
use dossier_db::{BestEffortMirror, CollectionRepository, MemoryDocumentStore};
use dossier_storage::{ObjectMetadata, Storage, StorageError, StorageResult, StoredObject};

use super::documents::{DocumentScope, NewDocument};
use super::RecordServices;
use crate::screen::RecordScreen;
use crate::upload::{UploadValidator, UploadedFile};

const OWNER: &str = "admin-uid";

/// In-memory storage whose deletes can be made to fail.
#[derive(Default)]
struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_deletes: bool,
}

impl MockStorage {
    fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Default::default()
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        _metadata: &ObjectMetadata,
    ) -> StorageResult<StoredObject> {
        self.files.lock().unwrap().insert(key.to_string(), data);
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("https://files.test/{}", key),
        })
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.fail_deletes {
            return Err(StorageError::DeleteFailed("bucket unavailable".to_string()));
        }
        self.files.lock().unwrap().remove(key);
        Ok(())
    }

    async fn get_download_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        Ok(format!("https://files.test/{}?signed", key))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.contains(key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

struct Fixture {
    services: RecordServices,
    storage: Arc<MockStorage>,
    store: Arc<MemoryDocumentStore>,
}

fn fixture_with(storage: MockStorage) -> Fixture {
    let store = Arc::new(MemoryDocumentStore::new());
    let storage = Arc::new(storage);
    let validator = UploadValidator::new(
        MAX_BANNER_IMAGE_BYTES,
        1024 * 1024,
        parse_extension_list(DEFAULT_DOCUMENT_EXTENSIONS),
    );
    let services = RecordServices::new(
        store.clone(),
        storage.clone(),
        BestEffortMirror::disabled(),
        validator,
        16,
    );
    Fixture {
        services,
        storage,
        store,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockStorage::default())
}

fn file(name: &str, content_type: &str, len: usize) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: Some(content_type.to_string()),
        data: vec![7; len],
    }
}

fn banner(name: &str) -> BannerInput {
    BannerInput {
        name: name.to_string(),
        active: true,
    }
}

async fn client(fx: &Fixture) -> String {
    fx.services
        .clients
        .create(
            OWNER,
            ClientInput {
                name: "Acme".to_string(),
                email: Some("books@acme.test".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
}

async fn upload(fx: &Fixture, client_id: &str, year: &str, name: &str, len: usize) -> DocumentRecord {
    fx.services
        .documents
        .upload(
            OWNER,
            client_id,
            DocumentScope::Yearly,
            NewDocument {
                name: None,
                year: Some(year.to_string()),
                file: file(name, "application/pdf", len),
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_upload_inlines_small_files_only() {
    let fx = fixture();
    let client_id = client(&fx).await;

    let small = upload(&fx, &client_id, "2024", "small.pdf", 16).await;
    let large = upload(&fx, &client_id, "2024", "large.pdf", 17).await;

    assert!(small.inline_payload.is_some());
    assert!(large.inline_payload.is_none());
    assert_eq!(small.name, "small.pdf");
    assert!(fx.storage.contains(large.storage_path.as_deref().unwrap()));

    let years = fx.services.years.list(OWNER, &client_id).await.unwrap();
    assert_eq!(years.len(), 1);
    assert_eq!(years[0].label, "2024");
}

#[tokio::test]
async fn test_yearly_upload_requires_year() {
    let fx = fixture();
    let client_id = client(&fx).await;
    let err = fx
        .services
        .documents
        .upload(
            OWNER,
            &client_id,
            DocumentScope::Yearly,
            NewDocument {
                name: Some("Invoice".to_string()),
                year: Some("  ".to_string()),
                file: file("a.pdf", "application/pdf", 3),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(fx.storage.len(), 0);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let fx = fixture();
    let client_id = client(&fx).await;
    let err = fx
        .services
        .documents
        .upload(
            OWNER,
            &client_id,
            DocumentScope::Generic,
            NewDocument {
                name: None,
                year: None,
                file: file("tool.exe", "application/octet-stream", 3),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnsupportedFileType(msg) if msg.contains("tool.exe")));
}

#[tokio::test]
async fn test_delete_survives_failing_storage() {
    let fx = fixture_with(MockStorage::failing_deletes());
    let client_id = client(&fx).await;
    let doc = upload(&fx, &client_id, "2024", "invoice.pdf", 3).await;

    let repo: CollectionRepository<DocumentRecord> = CollectionRepository::new(fx.store.clone());
    let mut screen = RecordScreen::mount(repo, CollectionPath::documents(OWNER, &client_id))
        .await
        .unwrap();
    assert_eq!(screen.items().len(), 1);

    fx.services
        .documents
        .delete(OWNER, &client_id, DocumentScope::Yearly, &doc.id)
        .await
        .unwrap();

    let rows = screen.next_update().await.unwrap().unwrap();
    assert!(rows.iter().all(|r| r.id != doc.id));
    assert!(fx.storage.contains(doc.storage_path.as_deref().unwrap()));
}

#[tokio::test]
async fn test_generic_document_cannot_take_a_year() {
    let fx = fixture();
    let client_id = client(&fx).await;
    let doc = fx
        .services
        .documents
        .upload(
            OWNER,
            &client_id,
            DocumentScope::Generic,
            NewDocument {
                name: Some("Contract".to_string()),
                year: None,
                file: file("contract.docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document", 5),
            },
        )
        .await
        .unwrap();
    assert!(doc.is_generic());

    let err = fx
        .services
        .documents
        .update(
            OWNER,
            &client_id,
            DocumentScope::Generic,
            &doc.id,
            DocumentUpdate {
                name: None,
                year: Some("2024".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_deleting_year_cascades_to_its_documents() {
    let fx = fixture();
    let client_id = client(&fx).await;
    let doomed = upload(&fx, &client_id, "2023", "old.pdf", 3).await;
    let kept = upload(&fx, &client_id, "2024", "new.pdf", 3).await;

    fx.services.years.delete(OWNER, &client_id, "2023").await.unwrap();

    let remaining = fx
        .services
        .documents
        .list(OWNER, &client_id, DocumentScope::Yearly)
        .await
        .unwrap();
    assert_eq!(remaining, vec![kept]);
    assert!(!fx.storage.contains(doomed.storage_path.as_deref().unwrap()));
}

#[tokio::test]
async fn test_renaming_year_refiles_documents() {
    let fx = fixture();
    let client_id = client(&fx).await;
    let doc = upload(&fx, &client_id, "2O24", "typo.pdf", 3).await;

    let year = fx
        .services
        .years
        .update(OWNER, &client_id, "2O24", YearInput { label: "2024".to_string() })
        .await
        .unwrap();
    assert_eq!(year.id, "2024");

    let moved = fx
        .services
        .documents
        .get(OWNER, &client_id, DocumentScope::Yearly, &doc.id)
        .await
        .unwrap();
    assert_eq!(moved.year.as_deref(), Some("2024"));
    let labels: Vec<String> = fx
        .services
        .years
        .list(OWNER, &client_id)
        .await
        .unwrap()
        .into_iter()
        .map(|y| y.label)
        .collect();
    assert_eq!(labels, vec!["2024".to_string()]);
}

#[tokio::test]
async fn test_duplicate_year_rejected() {
    let fx = fixture();
    let client_id = client(&fx).await;
    let input = || YearInput {
        label: "2024".to_string(),
    };
    fx.services.years.create(OWNER, &client_id, input()).await.unwrap();
    let err = fx
        .services
        .years
        .create(OWNER, &client_id, input())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(msg) if msg.contains("2024")));
}

#[tokio::test]
async fn test_deleting_client_cascades() {
    let fx = fixture();
    let client_id = client(&fx).await;
    upload(&fx, &client_id, "2024", "a.pdf", 3).await;
    fx.services
        .documents
        .upload(
            OWNER,
            &client_id,
            DocumentScope::Generic,
            NewDocument {
                name: None,
                year: None,
                file: file("b.png", "image/png", 3),
            },
        )
        .await
        .unwrap();

    fx.services.clients.delete(OWNER, &client_id).await.unwrap();

    assert!(fx.services.clients.list(OWNER).await.unwrap().is_empty());
    assert!(fx.services.years.list(OWNER, &client_id).await.unwrap().is_empty());
    for scope in [DocumentScope::Yearly, DocumentScope::Generic] {
        assert!(fx
            .services
            .documents
            .list(OWNER, &client_id, scope)
            .await
            .unwrap()
            .is_empty());
    }
    assert_eq!(fx.storage.len(), 0);
}

#[tokio::test]
async fn test_banner_names_collapse_to_one_key() {
    let fx = fixture();
    let first = fx
        .services
        .banners
        .create(OWNER, banner("Q1 Promo!"), file("promo.png", "image/png", 10))
        .await
        .unwrap();
    assert_eq!(first.id, "q1_promo");

    let err = fx
        .services
        .banners
        .create(OWNER, banner("q1 promo"), file("other.png", "image/png", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(msg) if msg.contains("'q1_promo'")));
    assert_eq!(fx.storage.len(), 1);
}

#[tokio::test]
async fn test_banner_image_limit() {
    let fx = fixture();
    fx.services
        .banners
        .create(OWNER, banner("Exact"), file("a.png", "image/png", MAX_BANNER_IMAGE_BYTES))
        .await
        .unwrap();
    let err = fx
        .services
        .banners
        .create(OWNER, banner("Over"), file("b.png", "image/png", MAX_BANNER_IMAGE_BYTES + 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PayloadTooLarge(msg) if msg.contains("5 MB")));
}

#[tokio::test]
async fn test_banner_image_replacement_removes_old_image() {
    let fx = fixture();
    let created = fx
        .services
        .banners
        .create(OWNER, banner("Spring"), file("a.png", "image/png", 10))
        .await
        .unwrap();

    let updated = fx
        .services
        .banners
        .update(
            OWNER,
            &created.id,
            BannerUpdate { active: Some(false) },
            Some(file("b.jpg", "image/jpeg", 12)),
        )
        .await
        .unwrap();

    assert!(!updated.active);
    assert_eq!(updated.name, "Spring");
    assert_ne!(updated.image_storage_path, created.image_storage_path);
    assert!(!fx.storage.contains(&created.image_storage_path));
    assert!(fx.storage.contains(&updated.image_storage_path));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let fx = fixture();
    let client_id = client(&fx).await;
    upload(&fx, &client_id, "2024", "a.pdf", 3).await;
    fx.services
        .banners
        .create(
            OWNER,
            BannerInput {
                name: "Off".to_string(),
                active: false,
            },
            file("a.png", "image/png", 10),
        )
        .await
        .unwrap();

    let summary = crate::summarize(
        OWNER,
        &fx.services.clients,
        &fx.services.documents,
        &fx.services.banners,
        &fx.services.notifications,
    )
    .await
    .unwrap();
    assert_eq!(summary.clients, 1);
    assert_eq!(summary.documents, 1);
    assert_eq!(summary.banners, 1);
    assert_eq!(summary.active_banners, 0);
}
