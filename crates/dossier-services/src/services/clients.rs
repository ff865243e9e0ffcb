use chrono::Utc;
use dossier_core::{AppError, Client, ClientInput, CollectionPath};
use dossier_db::{CollectionRepository, TypedSubscription};

use super::documents::{DocumentScope, DocumentService};
use super::years::YearService;
use crate::screen::RecordScreen;

#[derive(Clone)]
pub struct ClientService {
    clients: CollectionRepository<Client>,
    years: YearService,
    documents: DocumentService,
}

impl ClientService {
    pub fn new(
        clients: CollectionRepository<Client>,
        years: YearService,
        documents: DocumentService,
    ) -> Self {
        Self {
            clients,
            years,
            documents,
        }
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<Client>, AppError> {
        self.clients.list(&CollectionPath::clients(owner)).await
    }

    pub async fn get(&self, owner: &str, id: &str) -> Result<Client, AppError> {
        self.clients.find(&CollectionPath::clients(owner), id).await
    }

    pub async fn subscribe(&self, owner: &str) -> Result<TypedSubscription<Client>, AppError> {
        self.clients.subscribe(&CollectionPath::clients(owner)).await
    }

    /// Mount a live list of the owner's clients.
    pub async fn screen(&self, owner: &str) -> Result<RecordScreen<Client>, AppError> {
        RecordScreen::mount(self.clients.clone(), CollectionPath::clients(owner)).await
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn create(&self, owner: &str, input: ClientInput) -> Result<Client, AppError> {
        let input = input.normalized()?;
        let client = Client::from_input(input, Utc::now());
        let client = self
            .clients
            .insert(&CollectionPath::clients(owner), client)
            .await?;
        tracing::info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        input: ClientInput,
    ) -> Result<Client, AppError> {
        let input = input.normalized()?;
        let path = CollectionPath::clients(owner);
        let mut client = self.clients.find(&path, id).await?;
        client.apply(input, Utc::now());
        self.clients.save(&path, &client).await?;
        Ok(client)
    }

    /// Delete a client with all of its years and documents.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: &str, id: &str) -> Result<(), AppError> {
        let path = CollectionPath::clients(owner);
        self.clients.find(&path, id).await?;

        let documents = self
            .documents
            .purge(owner, id, DocumentScope::Yearly, None)
            .await?;
        let generic = self
            .documents
            .purge(owner, id, DocumentScope::Generic, None)
            .await?;
        let years = self.years.purge(owner, id).await?;
        self.clients.remove(&path, id).await?;

        tracing::info!(client_id = %id, documents, generic, years, "Client deleted");
        Ok(())
    }
}
