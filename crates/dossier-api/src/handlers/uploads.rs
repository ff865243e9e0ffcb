use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use dossier_services::{DropOutcome, PendingFile};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadCheckRequest {
    pub files: Vec<PendingFile>,
}

/// Check a dropped batch against the document allow-list before uploading.
#[utoipa::path(
    post,
    path = "/api/v1/uploads/check",
    tag = "uploads",
    request_body = UploadCheckRequest,
    responses(
        (status = 200, description = "Accepted files and one message naming every rejected file", body = DropOutcome),
        (status = 400, description = "Invalid request body", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, _admin, request), fields(files = request.files.len()))]
pub async fn check_upload_batch(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    ValidatedJson(request): ValidatedJson<UploadCheckRequest>,
) -> Result<Json<DropOutcome>, HttpAppError> {
    let outcome = state.validator.filter_dropped_files(request.files);
    if let Some(rejection) = &outcome.rejection {
        tracing::debug!(rejection = %rejection, "Dropped files rejected");
    }
    Ok(Json(outcome))
}
