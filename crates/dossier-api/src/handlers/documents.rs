//! Yearly client documents. Shared pieces are reused by the generic
//! document handlers.

use super::multipart::read_upload_form;
use super::stream::screen_events;
use super::DeleteQuery;
use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dossier_core::{DocumentRecord, DocumentUpdate};
use dossier_preview::{FileReference, PreviewState};
use dossier_services::{DocumentScope, NewDocument};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PreviewQuery {
    /// Page to show for paged documents, starting at 1
    pub page: Option<u32>,
}

pub(crate) async fn upload_document(
    state: &AppState,
    admin: &AdminContext,
    client_id: &str,
    scope: DocumentScope,
    multipart: Multipart,
) -> Result<DocumentRecord, HttpAppError> {
    let mut form = read_upload_form(multipart).await?;
    let input = NewDocument {
        name: form.text("name"),
        year: form.text("year"),
        file: form.require_file()?,
    };
    Ok(state
        .services
        .documents
        .upload(admin.owner(), client_id, scope, input)
        .await?)
}

pub(crate) async fn preview_document(
    state: &AppState,
    admin: &AdminContext,
    client_id: &str,
    scope: DocumentScope,
    document_id: &str,
    page: Option<u32>,
) -> Result<PreviewState, HttpAppError> {
    let record = state
        .services
        .documents
        .get(admin.owner(), client_id, scope, document_id)
        .await?;
    let file = FileReference::from(&record);
    Ok(state.preview.preview(&file, page).await)
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/documents",
    tag = "documents",
    params(("id" = String, Path, description = "Client ID")),
    responses((status = 200, description = "Yearly documents of the client", body = Vec<DocumentRecord>))
)]
#[tracing::instrument(skip(state, admin))]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<DocumentRecord>>, HttpAppError> {
    Ok(Json(
        state
            .services
            .documents
            .list(admin.owner(), &client_id, DocumentScope::Yearly)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients/{id}/documents",
    tag = "documents",
    params(("id" = String, Path, description = "Client ID")),
    request_body(content = String, description = "Multipart form with `file`, `year` and optional `name`", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded", body = DocumentRecord),
        (status = 400, description = "Missing year or file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "File type not allowed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, multipart), fields(operation = "upload_document"))]
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let record =
        upload_document(&state, &admin, &client_id, DocumentScope::Yearly, multipart).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}/documents/{doc}",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("doc" = String, Path, description = "Document ID")
    ),
    request_body = DocumentUpdate,
    responses(
        (status = 200, description = "Document updated", body = DocumentRecord),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, update))]
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, document_id)): Path<(String, String)>,
    ValidatedJson(update): ValidatedJson<DocumentUpdate>,
) -> Result<Json<DocumentRecord>, HttpAppError> {
    Ok(Json(
        state
            .services
            .documents
            .update(
                admin.owner(),
                &client_id,
                DocumentScope::Yearly,
                &document_id,
                update,
            )
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}/documents/{doc}",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("doc" = String, Path, description = "Document ID"),
        DeleteQuery
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 400, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "delete_document"))]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, document_id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, HttpAppError> {
    query.require_confirmation("document")?;
    state
        .services
        .documents
        .delete(admin.owner(), &client_id, DocumentScope::Yearly, &document_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, admin))]
pub async fn stream_documents(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let screen = state
        .services
        .documents
        .screen(admin.owner(), &client_id, DocumentScope::Yearly)
        .await?;
    Ok(screen_events(screen))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/documents/{doc}/preview",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("doc" = String, Path, description = "Document ID"),
        PreviewQuery
    ),
    responses(
        (status = 200, description = "How to present the document; failures degrade to a simpler mode"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "preview_document"))]
pub async fn get_document_preview(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, document_id)): Path<(String, String)>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewState>, HttpAppError> {
    let preview = preview_document(
        &state,
        &admin,
        &client_id,
        DocumentScope::Yearly,
        &document_id,
        query.page,
    )
    .await?;
    Ok(Json(preview))
}
