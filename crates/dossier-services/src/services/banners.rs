use std::sync::Arc;

use chrono::Utc;
use dossier_core::{AppError, Banner, BannerInput, BannerUpdate, CollectionPath};
use dossier_db::{CollectionRepository, TypedSubscription};
use dossier_storage::{banner_key, ObjectMetadata, Storage, StoredObject};
use uuid::Uuid;

use super::delete_file_best_effort;
use crate::screen::RecordScreen;
use crate::upload::{UploadValidator, UploadedFile};

#[derive(Clone)]
pub struct BannerService {
    banners: CollectionRepository<Banner>,
    storage: Arc<dyn Storage>,
    validator: UploadValidator,
}

impl BannerService {
    pub fn new(
        banners: CollectionRepository<Banner>,
        storage: Arc<dyn Storage>,
        validator: UploadValidator,
    ) -> Self {
        Self {
            banners,
            storage,
            validator,
        }
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<Banner>, AppError> {
        self.banners.list(&CollectionPath::banners(owner)).await
    }

    pub async fn get(&self, owner: &str, id: &str) -> Result<Banner, AppError> {
        self.banners.find(&CollectionPath::banners(owner), id).await
    }

    pub async fn subscribe(&self, owner: &str) -> Result<TypedSubscription<Banner>, AppError> {
        self.banners.subscribe(&CollectionPath::banners(owner)).await
    }

    pub async fn screen(&self, owner: &str) -> Result<RecordScreen<Banner>, AppError> {
        RecordScreen::mount(self.banners.clone(), CollectionPath::banners(owner)).await
    }

    /// Create a banner keyed by its derived name. Names that normalize to
    /// the same key collide and the second one is rejected.
    #[tracing::instrument(skip(self, input, image), fields(banner_name = %input.name))]
    pub async fn create(
        &self,
        owner: &str,
        input: BannerInput,
        image: UploadedFile,
    ) -> Result<Banner, AppError> {
        let (name, key) = input.name_and_key()?;
        self.validator
            .validate_banner_image(image.content_type.as_deref(), image.size())?;

        let path = CollectionPath::banners(owner);
        if self.banners.get(&path, &key).await?.is_some() {
            return Err(duplicate(&key));
        }

        let file_name = image.file_name.clone();
        let content_type = image.content_type.clone().unwrap_or_default();
        let file_size = image.size() as u64;
        let stored = self.store_image(owner, &key, image).await?;

        let now = Utc::now();
        let banner = Banner {
            id: key.clone(),
            name,
            image_url: stored.url,
            image_storage_path: stored.key.clone(),
            active: input.active,
            file_name,
            content_type,
            file_size,
            created_at: now,
            updated_at: now,
        };

        match self.banners.insert(&path, banner).await {
            Ok(banner) => {
                tracing::info!(banner_id = %banner.id, "Banner created");
                Ok(banner)
            }
            Err(e) => {
                delete_file_best_effort(&self.storage, &stored.key).await;
                Err(match e {
                    AppError::Duplicate(_) => duplicate(&key),
                    other => other,
                })
            }
        }
    }

    /// Toggle the active flag and optionally replace the image. The name,
    /// and therefore the id, cannot change.
    #[tracing::instrument(skip(self, update, image))]
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        update: BannerUpdate,
        image: Option<UploadedFile>,
    ) -> Result<Banner, AppError> {
        let path = CollectionPath::banners(owner);
        let mut banner = self.banners.find(&path, id).await?;

        if let Some(active) = update.active {
            banner.active = active;
        }

        let mut replaced = None;
        if let Some(image) = image {
            self.validator
                .validate_banner_image(image.content_type.as_deref(), image.size())?;
            banner.file_name = image.file_name.clone();
            banner.content_type = image.content_type.clone().unwrap_or_default();
            banner.file_size = image.size() as u64;
            let stored = self.store_image(owner, id, image).await?;
            banner.image_url = stored.url;
            replaced = Some(std::mem::replace(&mut banner.image_storage_path, stored.key));
        }

        banner.updated_at = Utc::now();
        self.banners.save(&path, &banner).await?;

        if let Some(old_key) = replaced {
            delete_file_best_effort(&self.storage, &old_key).await;
        }
        Ok(banner)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: &str, id: &str) -> Result<(), AppError> {
        let path = CollectionPath::banners(owner);
        let banner = self.banners.find(&path, id).await?;
        self.banners.remove(&path, id).await?;
        delete_file_best_effort(&self.storage, &banner.image_storage_path).await;
        tracing::info!(banner_id = %id, "Banner deleted");
        Ok(())
    }

    /// Each upload gets a fresh object key so a replacement never overwrites
    /// the image still referenced by the record.
    async fn store_image(
        &self,
        owner: &str,
        banner_id: &str,
        image: UploadedFile,
    ) -> Result<StoredObject, AppError> {
        let object_name = format!("{}_{}", Uuid::new_v4().simple(), image.file_name);
        let key = banner_key(owner, banner_id, &object_name);
        let content_type = image
            .content_type
            .clone()
            .unwrap_or_else(|| dossier_storage::content_type_for_key(&image.file_name).to_string());
        let metadata = ObjectMetadata::new(content_type).with_file_name(image.file_name);
        Ok(self.storage.upload(&key, image.data, &metadata).await?)
    }
}

fn duplicate(key: &str) -> AppError {
    AppError::Duplicate(format!("A banner named '{}' already exists", key))
}
