use dossier_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

use super::banners::BannerService;
use super::clients::ClientService;
use super::documents::{DocumentScope, DocumentService};
use super::notifications::NotificationService;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub clients: usize,
    pub documents: usize,
    pub generic_documents: usize,
    pub banners: usize,
    pub active_banners: usize,
    pub notifications: usize,
}

/// Record counts across every collection of one admin.
pub async fn summarize(
    owner: &str,
    clients: &ClientService,
    documents: &DocumentService,
    banners: &BannerService,
    notifications: &NotificationService,
) -> Result<DashboardSummary, AppError> {
    let mut summary = DashboardSummary::default();

    for client in clients.list(owner).await? {
        summary.clients += 1;
        summary.documents += documents
            .list(owner, &client.id, DocumentScope::Yearly)
            .await?
            .len();
        summary.generic_documents += documents
            .list(owner, &client.id, DocumentScope::Generic)
            .await?
            .len();
    }

    let banners = banners.list(owner).await?;
    summary.active_banners = banners.iter().filter(|b| b.active).count();
    summary.banners = banners.len();
    summary.notifications = notifications.list(owner).await?.len();

    Ok(summary)
}
