//! Sign-in, sign-out and session lookup.

use crate::auth::token::{cleared_session_cookie, session_cookie};
use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use dossier_core::AppError;
use dossier_services::AdminSession;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token, also set as the `dossier_session` cookie
    pub token: String,
    pub session: AdminSession,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "login"))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput("Email and password are required".to_string()).into());
    }

    let identity = state
        .auth
        .provider
        .sign_in(&request.email, &request.password)
        .await?;
    let session = state.auth.sessions.create(&identity).await;
    let token = state.auth.tokens.issue(&session)?;
    let cookie = session_cookie(
        &token,
        state.auth.sessions.ttl().num_seconds(),
        state.auth.secure_cookie,
    );

    tracing::info!(admin_uid = %identity.uid, "Admin signed in");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { token, session }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "No active session", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(operation = "logout", admin_uid = %admin.uid))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<impl IntoResponse, HttpAppError> {
    state.auth.sessions.remove(&admin.session_id).await;
    state.auth.provider.sign_out(&admin.identity()).await?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cleared_session_cookie())],
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session", body = AdminSession),
        (status = 401, description = "No active session", body = ErrorResponse)
    )
)]
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<Json<AdminSession>, HttpAppError> {
    let session = state
        .auth
        .sessions
        .get(&admin.session_id)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session has ended".to_string()))?;
    Ok(Json(session))
}
