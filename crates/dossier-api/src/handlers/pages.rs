//! HTML shells for the console pages. The browser app renders into `#app`.

use axum::{
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Admin pages, behind the session gate.
pub const ADMIN_PAGES: &[(&str, &str)] = &[
    ("/admin/dashboard", "Dashboard"),
    ("/admin/clients", "Clients"),
    ("/admin/clients/new", "New client"),
    ("/admin/clients/edit", "Edit client"),
    ("/admin/documents", "Documents"),
    ("/admin/generic-documents", "Generic documents"),
    ("/admin/years", "Years"),
    ("/admin/banners", "Banners"),
    ("/admin/notifications", "Notifications"),
];

fn shell(title: &str, page: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Dossier</title>\n</head>\n<body>\n\
         <div id=\"app\" data-page=\"{page}\"></div>\n</body>\n</html>\n"
    ))
}

pub async fn home() -> Html<String> {
    shell("Home", "home")
}

pub async fn login_page() -> Html<String> {
    shell("Sign in", "login")
}

pub async fn privacy_policy() -> Html<String> {
    shell("Privacy policy", "privacy-policy")
}

pub async fn admin_page(uri: Uri) -> Response {
    match ADMIN_PAGES.iter().find(|(path, _)| *path == uri.path()) {
        Some((path, title)) => shell(title, path.trim_start_matches("/admin/")).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

pub async fn fallback() -> Redirect {
    Redirect::to("/")
}
