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
use dossier_core::{Notification, NotificationInput};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "notifications",
    responses((status = 200, description = "Notifications", body = Vec<Notification>))
)]
#[tracing::instrument(skip(state, admin))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<Json<Vec<Notification>>, HttpAppError> {
    Ok(Json(state.services.notifications.list(admin.owner()).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    tag = "notifications",
    request_body = NotificationInput,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Missing title or message", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, input), fields(operation = "create_notification"))]
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(input): ValidatedJson<NotificationInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    let notification = state
        .services
        .notifications
        .create(admin.owner(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}",
    tag = "notifications",
    params(("id" = String, Path, description = "Notification ID")),
    request_body = NotificationInput,
    responses(
        (status = 200, description = "Notification updated", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, input))]
pub async fn update_notification(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<NotificationInput>,
) -> Result<Json<Notification>, HttpAppError> {
    Ok(Json(
        state
            .services
            .notifications
            .update(admin.owner(), &id, input)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    tag = "notifications",
    params(("id" = String, Path, description = "Notification ID"), DeleteQuery),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 400, description = "Deletion not confirmed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin))]
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, HttpAppError> {
    query.require_confirmation("notification")?;
    state
        .services
        .notifications
        .delete(admin.owner(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
