use chrono::Utc;
use dossier_core::{AppError, CollectionPath, Notification, NotificationInput};
use dossier_db::{CollectionRepository, TypedSubscription};

#[derive(Clone)]
pub struct NotificationService {
    notifications: CollectionRepository<Notification>,
}

impl NotificationService {
    pub fn new(notifications: CollectionRepository<Notification>) -> Self {
        Self { notifications }
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<Notification>, AppError> {
        self.notifications
            .list(&CollectionPath::notifications(owner))
            .await
    }

    pub async fn subscribe(
        &self,
        owner: &str,
    ) -> Result<TypedSubscription<Notification>, AppError> {
        self.notifications
            .subscribe(&CollectionPath::notifications(owner))
            .await
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn create(
        &self,
        owner: &str,
        input: NotificationInput,
    ) -> Result<Notification, AppError> {
        let notification = Notification::from_input(input, Utc::now())?;
        self.notifications
            .insert(&CollectionPath::notifications(owner), notification)
            .await
    }

    /// Replace title, message and audience. The creation time is kept.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        input: NotificationInput,
    ) -> Result<Notification, AppError> {
        let path = CollectionPath::notifications(owner);
        let current = self.notifications.find(&path, id).await?;
        let mut updated = Notification::from_input(input, current.created_at)?;
        updated.id = current.id;
        self.notifications.save(&path, &updated).await?;
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: &str, id: &str) -> Result<(), AppError> {
        self.notifications
            .remove(&CollectionPath::notifications(owner), id)
            .await
    }
}
