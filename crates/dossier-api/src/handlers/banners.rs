//! Banner records. Banners are keyed by their derived name, so two names
//! that normalize alike cannot both exist.

use super::multipart::read_upload_form;
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
use dossier_core::{Banner, BannerInput, BannerUpdate};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/banners",
    tag = "banners",
    responses((status = 200, description = "Banners of the signed-in admin", body = Vec<Banner>))
)]
#[tracing::instrument(skip(state, admin))]
pub async fn list_banners(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<Json<Vec<Banner>>, HttpAppError> {
    Ok(Json(state.services.banners.list(admin.owner()).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/banners",
    tag = "banners",
    request_body(content = String, description = "Multipart form with `name`, `file` and optional `active`", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Banner created", body = Banner),
        (status = 409, description = "A banner with the same derived name exists", body = ErrorResponse),
        (status = 413, description = "Image larger than 5 MB", body = ErrorResponse),
        (status = 415, description = "Not an image", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, multipart), fields(operation = "create_banner"))]
pub async fn create_banner(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = read_upload_form(multipart).await?;
    let input = BannerInput {
        name: form.text("name").unwrap_or_default(),
        active: form.flag("active").unwrap_or(true),
    };
    let image = form.require_file()?;

    let banner = state
        .services
        .banners
        .create(admin.owner(), input, image)
        .await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

#[utoipa::path(
    put,
    path = "/api/v1/banners/{id}",
    tag = "banners",
    params(("id" = String, Path, description = "Banner key")),
    request_body(content = String, description = "Multipart form with optional `active` and optional replacement `file`", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Banner updated", body = Banner),
        (status = 404, description = "Banner not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, multipart), fields(operation = "update_banner"))]
pub async fn update_banner(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Banner>, HttpAppError> {
    let mut form = read_upload_form(multipart).await?;
    let update = BannerUpdate {
        active: form.flag("active"),
    };
    let image = form.file.take();

    Ok(Json(
        state
            .services
            .banners
            .update(admin.owner(), &id, update, image)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/banners/{id}",
    tag = "banners",
    params(("id" = String, Path, description = "Banner key"), DeleteQuery),
    responses(
        (status = 204, description = "Banner deleted"),
        (status = 400, description = "Deletion not confirmed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "delete_banner"))]
pub async fn delete_banner(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, HttpAppError> {
    query.require_confirmation("banner")?;
    state.services.banners.delete(admin.owner(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, admin))]
pub async fn stream_banners(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let screen = state.services.banners.screen(admin.owner()).await?;
    Ok(screen_events(screen))
}
