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
use dossier_core::{Year, YearInput};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/years",
    tag = "years",
    params(("id" = String, Path, description = "Client ID")),
    responses((status = 200, description = "Year folders of the client", body = Vec<Year>))
)]
#[tracing::instrument(skip(state, admin))]
pub async fn list_years(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<Year>>, HttpAppError> {
    Ok(Json(
        state.services.years.list(admin.owner(), &client_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients/{id}/years",
    tag = "years",
    params(("id" = String, Path, description = "Client ID")),
    request_body = YearInput,
    responses(
        (status = 201, description = "Year created", body = Year),
        (status = 409, description = "Year already exists", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, input))]
pub async fn create_year(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(client_id): Path<String>,
    ValidatedJson(input): ValidatedJson<YearInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    let year = state
        .services
        .years
        .create(admin.owner(), &client_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(year)))
}

#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}/years/{year}",
    tag = "years",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("year" = String, Path, description = "Current year label")
    ),
    request_body = YearInput,
    responses(
        (status = 200, description = "Year renamed; its documents follow", body = Year),
        (status = 409, description = "Target year already exists", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, input))]
pub async fn update_year(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, label)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<YearInput>,
) -> Result<Json<Year>, HttpAppError> {
    Ok(Json(
        state
            .services
            .years
            .update(admin.owner(), &client_id, &label, input)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}/years/{year}",
    tag = "years",
    params(
        ("id" = String, Path, description = "Client ID"),
        ("year" = String, Path, description = "Year label"),
        DeleteQuery
    ),
    responses(
        (status = 204, description = "Year and its documents deleted"),
        (status = 400, description = "Deletion not confirmed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin))]
pub async fn delete_year(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((client_id, label)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, HttpAppError> {
    query.require_confirmation("year")?;
    state
        .services
        .years
        .delete(admin.owner(), &client_id, &label)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
