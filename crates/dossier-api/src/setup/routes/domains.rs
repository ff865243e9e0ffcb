//! Domain route groups (session, clients, years, documents, banners, etc.).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

/// Public HTML shells.
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/login", get(handlers::pages::login_page))
        .route("/privacy-policy", get(handlers::pages::privacy_policy))
}

/// Console pages, gated by the session cookie. Unlisted `/admin` paths are
/// gated too and only then sent home by `admin_page`.
pub fn admin_page_routes() -> Router<Arc<AppState>> {
    handlers::pages::ADMIN_PAGES
        .iter()
        .fold(Router::new(), |router, (path, _)| {
            router.route(path, get(handlers::pages::admin_page))
        })
        .route("/admin", get(handlers::pages::admin_page))
        .route("/admin/{*rest}", get(handlers::pages::admin_page))
}

/// The only API routes reachable without a session.
pub fn public_api_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/auth/login", API_PREFIX),
        post(handlers::auth::login),
    )
}

pub fn file_routes() -> Router<Arc<AppState>> {
    Router::new().route("/files/{*key}", get(handlers::files::serve_file))
}

pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/auth/logout", API_PREFIX),
            post(handlers::auth::logout),
        )
        .route(
            &format!("{}/auth/session", API_PREFIX),
            get(handlers::auth::current_session),
        )
        .route(
            &format!("{}/dashboard", API_PREFIX),
            get(handlers::dashboard::get_dashboard),
        )
}

pub fn client_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/clients", API_PREFIX),
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            &format!("{}/clients/stream", API_PREFIX),
            get(handlers::clients::stream_clients),
        )
        .route(
            &format!("{}/clients/{{id}}", API_PREFIX),
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
}

pub fn year_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/clients/{{id}}/years", API_PREFIX),
            get(handlers::years::list_years).post(handlers::years::create_year),
        )
        .route(
            &format!("{}/clients/{{id}}/years/{{year}}", API_PREFIX),
            put(handlers::years::update_year).delete(handlers::years::delete_year),
        )
}

pub fn document_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/clients/{{id}}/documents", API_PREFIX),
            get(handlers::documents::list_documents).post(handlers::documents::create_document),
        )
        .route(
            &format!("{}/clients/{{id}}/documents/stream", API_PREFIX),
            get(handlers::documents::stream_documents),
        )
        .route(
            &format!("{}/clients/{{id}}/documents/{{doc}}", API_PREFIX),
            put(handlers::documents::update_document).delete(handlers::documents::delete_document),
        )
        .route(
            &format!("{}/clients/{{id}}/documents/{{doc}}/preview", API_PREFIX),
            get(handlers::documents::get_document_preview),
        )
}

pub fn generic_document_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/clients/{{id}}/generic-documents", API_PREFIX),
            get(handlers::generic_documents::list_generic_documents)
                .post(handlers::generic_documents::create_generic_document),
        )
        .route(
            &format!("{}/clients/{{id}}/generic-documents/stream", API_PREFIX),
            get(handlers::generic_documents::stream_generic_documents),
        )
        .route(
            &format!("{}/clients/{{id}}/generic-documents/{{doc}}", API_PREFIX),
            axum::routing::delete(handlers::generic_documents::delete_generic_document),
        )
        .route(
            &format!("{}/clients/{{id}}/generic-documents/{{doc}}/preview", API_PREFIX),
            get(handlers::generic_documents::get_generic_document_preview),
        )
}

pub fn upload_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/uploads/check", API_PREFIX),
        post(handlers::uploads::check_upload_batch),
    )
}

pub fn banner_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/banners", API_PREFIX),
            get(handlers::banners::list_banners).post(handlers::banners::create_banner),
        )
        .route(
            &format!("{}/banners/stream", API_PREFIX),
            get(handlers::banners::stream_banners),
        )
        .route(
            &format!("{}/banners/{{id}}", API_PREFIX),
            put(handlers::banners::update_banner).delete(handlers::banners::delete_banner),
        )
}

pub fn notification_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/notifications", API_PREFIX),
            get(handlers::notifications::list_notifications)
                .post(handlers::notifications::create_notification),
        )
        .route(
            &format!("{}/notifications/{{id}}", API_PREFIX),
            put(handlers::notifications::update_notification)
                .delete(handlers::notifications::delete_notification),
        )
}
