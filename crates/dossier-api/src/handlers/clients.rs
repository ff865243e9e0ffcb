//! Client records.

use super::stream::screen_events;
use super::DeleteQuery;
use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dossier_core::{Client, ClientInput};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "clients",
    responses(
        (status = 200, description = "Clients of the signed-in admin", body = Vec<Client>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin))]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<Json<Vec<Client>>, HttpAppError> {
    Ok(Json(state.services.clients.list(admin.owner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client", body = Client),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin))]
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
) -> Result<Json<Client>, HttpAppError> {
    Ok(Json(state.services.clients.get(admin.owner(), &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "clients",
    request_body = ClientInput,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Missing name or invalid email", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, input), fields(operation = "create_client"))]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(input): ValidatedJson<ClientInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    let client = state.services.clients.create(admin.owner(), input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client ID")),
    request_body = ClientInput,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, input), fields(operation = "update_client"))]
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<ClientInput>,
) -> Result<Json<Client>, HttpAppError> {
    Ok(Json(
        state.services.clients.update(admin.owner(), &id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client ID"), DeleteQuery),
    responses(
        (status = 204, description = "Client, its years and documents deleted"),
        (status = 400, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "delete_client"))]
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, HttpAppError> {
    query.require_confirmation("client")?;
    state.services.clients.delete(admin.owner(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live list of clients as server-sent events.
#[tracing::instrument(skip(state, admin))]
pub async fn stream_clients(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let screen = state.services.clients.screen(admin.owner()).await?;
    Ok(screen_events(screen))
}
