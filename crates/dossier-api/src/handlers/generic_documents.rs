//! Client documents not filed under a year.

use super::documents::{preview_document, upload_document, PreviewQuery};
use super::stream::screen_events;
use super::DeleteQuery;
use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dossier_core::DocumentRecord;
use dossier_preview::PreviewState;
use dossier_services::DocumentScope;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/generic-documents",
    tag = "generic-documents",
    params(("id" = String, Path, description = "Client ID")),
    responses((status = 200, description = "Generic documents of the client", body = Vec<DocumentRecord>))
)]
#[tracing::instrument(skip(state, admin))]
pub async fn list_generic_documents(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<DocumentRecord>>, HttpAppError> {
    Ok(Json(
        state
            .services
            .documents
            .list(admin.owner(), &client_id, DocumentScope::Generic)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients/{id}/generic-documents",
    tag = "generic-documents",
    params(("id" = String, Path, description = "Client ID")),
    request_body(content = String, description = "Multipart form with `file` and optional `name`", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded", body = DocumentRecord),
        (status = 400, description = "Missing file, or a year was given", body = ErrorResponse),
        (status = 415, description = "File type not allowed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, multipart), fields(operation = "upload_generic_document"))]
pub async fn create_generic_document(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let record =
        upload_document(&state, &admin, &client_id, DocumentScope::Generic, multipart).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}/generic-documents/{doc}",
    tag = "generic-documents",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("doc" = String, Path, description = "Document ID"),
        DeleteQuery
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 400, description = "Deletion not confirmed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "delete_generic_document"))]
pub async fn delete_generic_document(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, document_id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, HttpAppError> {
    query.require_confirmation("document")?;
    state
        .services
        .documents
        .delete(admin.owner(), &client_id, DocumentScope::Generic, &document_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, admin))]
pub async fn stream_generic_documents(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let screen = state
        .services
        .documents
        .screen(admin.owner(), &client_id, DocumentScope::Generic)
        .await?;
    Ok(screen_events(screen))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/generic-documents/{doc}/preview",
    tag = "generic-documents",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("doc" = String, Path, description = "Document ID"),
        PreviewQuery
    ),
    responses(
        (status = 200, description = "How to present the document"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "preview_generic_document"))]
pub async fn get_generic_document_preview(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, document_id)): Path<(String, String)>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewState>, HttpAppError> {
    let preview = preview_document(
        &state,
        &admin,
        &client_id,
        DocumentScope::Generic,
        &document_id,
        query.page,
    )
    .await?;
    Ok(Json(preview))
}
