use chrono::Utc;
use dossier_core::{AppError, Client, CollectionPath, DocumentUpdate, Year, YearInput};
use dossier_db::{CollectionRepository, TypedSubscription};

use super::documents::{DocumentScope, DocumentService};

#[derive(Clone)]
pub struct YearService {
    years: CollectionRepository<Year>,
    clients: CollectionRepository<Client>,
    documents: DocumentService,
}

impl YearService {
    pub fn new(
        years: CollectionRepository<Year>,
        clients: CollectionRepository<Client>,
        documents: DocumentService,
    ) -> Self {
        Self {
            years,
            clients,
            documents,
        }
    }

    pub async fn list(&self, owner: &str, client_id: &str) -> Result<Vec<Year>, AppError> {
        self.years.list(&CollectionPath::years(owner, client_id)).await
    }

    pub async fn subscribe(
        &self,
        owner: &str,
        client_id: &str,
    ) -> Result<TypedSubscription<Year>, AppError> {
        self.years
            .subscribe(&CollectionPath::years(owner, client_id))
            .await
    }

    /// Create a year folder. The label is the id, so a repeated label is a
    /// duplicate.
    #[tracing::instrument(skip(self, input))]
    pub async fn create(
        &self,
        owner: &str,
        client_id: &str,
        input: YearInput,
    ) -> Result<Year, AppError> {
        self.clients
            .find(&CollectionPath::clients(owner), client_id)
            .await?;
        let year = Year::new(client_id, input, Utc::now())?;
        let label = year.label.clone();
        self.years
            .insert(&CollectionPath::years(owner, client_id), year)
            .await
            .map_err(|e| match e {
                AppError::Duplicate(_) => {
                    AppError::Duplicate(format!("Year {} already exists", label))
                }
                other => other,
            })
    }

    /// Rename a year folder and refile its documents under the new label.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        owner: &str,
        client_id: &str,
        label: &str,
        input: YearInput,
    ) -> Result<Year, AppError> {
        let path = CollectionPath::years(owner, client_id);
        let current = self.years.find(&path, label).await?;
        let renamed = Year::new(client_id, input, current.created_at)?;
        if renamed.id == current.id {
            return Ok(current);
        }

        let renamed = self.create(owner, client_id, YearInput { label: renamed.label }).await?;
        for document in self
            .documents
            .list(owner, client_id, DocumentScope::Yearly)
            .await?
            .into_iter()
            .filter(|d| d.year.as_deref() == Some(label))
        {
            self.documents
                .update(
                    owner,
                    client_id,
                    DocumentScope::Yearly,
                    &document.id,
                    DocumentUpdate {
                        name: None,
                        year: Some(renamed.label.clone()),
                    },
                )
                .await?;
        }
        self.years.remove(&path, label).await?;
        Ok(renamed)
    }

    /// Delete a year folder together with the documents filed under it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: &str, client_id: &str, label: &str) -> Result<(), AppError> {
        let path = CollectionPath::years(owner, client_id);
        self.years.find(&path, label).await?;
        let removed = self
            .documents
            .purge(owner, client_id, DocumentScope::Yearly, Some(label))
            .await?;
        self.years.remove(&path, label).await?;
        tracing::info!(year = %label, documents = removed, "Year deleted");
        Ok(())
    }

    /// Remove every year of a client, used when the client itself is deleted.
    pub(crate) async fn purge(&self, owner: &str, client_id: &str) -> Result<usize, AppError> {
        let path = CollectionPath::years(owner, client_id);
        let years = self.years.list(&path).await?;
        let count = years.len();
        for year in years {
            self.years.remove(&path, &year.id).await?;
        }
        Ok(count)
    }
}
