//! Signed file downloads for the local storage backend.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use dossier_storage::{content_type_for_key, SignatureError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FileQuery {
    /// Unix timestamp (seconds) after which the link stops working
    pub expires: Option<u64>,
    pub signature: Option<String>,
}

#[utoipa::path(
    get,
    path = "/files/{key}",
    tag = "files",
    params(("key" = String, Path, description = "Storage key"), FileQuery),
    responses(
        (status = 200, description = "File contents"),
        (status = 401, description = "Link signature invalid or expired", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(key = %key))]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<FileQuery>,
) -> Result<Response, HttpAppError> {
    let (Some(expires), Some(signature)) = (query.expires, query.signature) else {
        return Err(SignatureError::Invalid.into());
    };
    state.files.signer.verify(&key, expires, &signature)?;

    let data = state.storage.download(&key).await?;
    let remaining = expires.saturating_sub(chrono::Utc::now().timestamp().max(0) as u64);
    tracing::debug!(size_bytes = data.len(), "Serving signed file");

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for_key(&key).to_string()),
            (header::CACHE_CONTROL, format!("private, max-age={}", remaining)),
        ],
        data,
    )
        .into_response())
}
