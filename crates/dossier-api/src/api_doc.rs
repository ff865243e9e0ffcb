//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use dossier_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dossier API",
        version = "0.1.0",
        description = "Admin console API for client records, yearly and generic documents, banners and notifications. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Auth
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::current_session,
        handlers::dashboard::get_dashboard,
        // Clients
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        // Years
        handlers::years::list_years,
        handlers::years::create_year,
        handlers::years::update_year,
        handlers::years::delete_year,
        // Documents
        handlers::documents::list_documents,
        handlers::documents::create_document,
        handlers::documents::update_document,
        handlers::documents::delete_document,
        handlers::documents::get_document_preview,
        handlers::generic_documents::list_generic_documents,
        handlers::generic_documents::create_generic_document,
        handlers::generic_documents::delete_generic_document,
        handlers::generic_documents::get_generic_document_preview,
        handlers::uploads::check_upload_batch,
        // Banners
        handlers::banners::list_banners,
        handlers::banners::create_banner,
        handlers::banners::update_banner,
        handlers::banners::delete_banner,
        // Notifications
        handlers::notifications::list_notifications,
        handlers::notifications::create_notification,
        handlers::notifications::update_notification,
        handlers::notifications::delete_notification,
        // Files
        handlers::files::serve_file,
    ),
    components(
        schemas(
            models::Client,
            models::ClientInput,
            models::Year,
            models::YearInput,
            models::DocumentRecord,
            models::DocumentUpdate,
            models::InlinePayload,
            models::Banner,
            models::BannerInput,
            models::BannerUpdate,
            models::Notification,
            models::NotificationInput,
            models::NotificationAudience,
            dossier_services::DashboardSummary,
            dossier_services::AdminSession,
            dossier_services::PendingFile,
            dossier_services::DropOutcome,
            handlers::auth::LoginRequest,
            handlers::auth::LoginResponse,
            handlers::uploads::UploadCheckRequest,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Admin sign-in and session"),
        (name = "dashboard", description = "Record counts"),
        (name = "clients", description = "Client records"),
        (name = "years", description = "Year folders of a client"),
        (name = "documents", description = "Yearly client documents and their previews"),
        (name = "generic-documents", description = "Client documents not filed under a year"),
        (name = "uploads", description = "Drag-and-drop allow-list check"),
        (name = "banners", description = "Banner images"),
        (name = "notifications", description = "Notifications sent to clients"),
        (name = "files", description = "Signed downloads from local storage")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_versioned_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/v1/clients"));
        assert!(spec.paths.paths.contains_key("/api/v1/banners/{id}"));
    }
}
