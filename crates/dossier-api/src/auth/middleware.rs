use crate::auth::models::AdminContext;
use crate::auth::token::{token_from_headers, SessionTokens};
use crate::constants::LOGIN_PAGE;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use dossier_core::AppError;
use dossier_services::{AuthProvider, SessionRegistry};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub provider: Arc<dyn AuthProvider>,
    pub sessions: Arc<SessionRegistry>,
    pub tokens: SessionTokens,
    /// Mark the session cookie `Secure`
    pub secure_cookie: bool,
}

impl AuthState {
    /// Resolve request headers to a live admin session.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AdminContext, AppError> {
        let token = token_from_headers(headers)
            .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_string()))?;
        let claims = self.tokens.verify(&token)?;

        let session = self
            .sessions
            .get(&claims.sid)
            .await
            .filter(|s| s.uid == claims.sub)
            .ok_or_else(|| AppError::Unauthorized("Session has ended".to_string()))?;

        Ok(AdminContext {
            uid: session.uid,
            email: session.email,
            session_id: session.id,
        })
    }
}

/// Gate for `/api` routes: unauthenticated calls get a 401 JSON body.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match auth_state.authenticate(request.headers()).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}

/// Gate for `/admin` pages: unauthenticated visitors are sent to the login page.
pub async fn page_gate_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match auth_state.authenticate(request.headers()).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), reason = %e, "Redirecting to login");
            Redirect::to(LOGIN_PAGE).into_response()
        }
    }
}
