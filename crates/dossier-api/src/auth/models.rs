use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use dossier_services::AdminIdentity;

/// Signed-in admin, stored in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub uid: String,
    pub email: String,
    pub session_id: String,
}

impl AdminContext {
    /// Owner id every collection is scoped to.
    pub fn owner(&self) -> &str {
        &self.uid
    }

    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

// Extracted from request parts so handlers taking Multipart can use it too
impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(
                        ErrorResponse::new("Missing admin session", "MISSING_SESSION")
                            .with_suggested_action("Sign in again"),
                    ),
                )
            })
    }
}
