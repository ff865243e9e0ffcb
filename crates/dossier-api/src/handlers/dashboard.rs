use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use dossier_services::{summarize, DashboardSummary};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Record counts", body = DashboardSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "dashboard"))]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<Json<DashboardSummary>, HttpAppError> {
    let services = &state.services;
    let summary = summarize(
        admin.owner(),
        &services.clients,
        &services.documents,
        &services.banners,
        &services.notifications,
    )
    .await?;
    Ok(Json(summary))
}
