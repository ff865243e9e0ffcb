//! Session and gate integration tests.
//!
//! Run with: `cargo test -p dossier-api --test auth_test`

mod helpers;

use helpers::{api_path, bearer, login, setup_test_app, TEST_ADMIN_EMAIL};
use serde_json::{json, Value};

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": TEST_ADMIN_EMAIL, "password": helpers::TEST_ADMIN_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), 200);
    let cookie = response.header("set-cookie");
    let cookie = cookie.to_str().expect("cookie is ascii");
    assert!(cookie.starts_with("dossier_session="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json();
    assert_eq!(body["session"]["email"], TEST_ADMIN_EMAIL);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": TEST_ADMIN_EMAIL, "password": "nope" }))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": TEST_ADMIN_EMAIL }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_api_without_session_returns_json_401() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/clients")).await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = setup_test_app().await;
    let token = login(app.client()).await;

    let response = app
        .client()
        .get(&api_path("/auth/session"))
        .add_header("Cookie", format!("dossier_session={}", token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["email"], TEST_ADMIN_EMAIL);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    let response = client
        .post(&api_path("/auth/logout"))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 204);

    // The token still verifies, but its session is gone.
    let response = client
        .get(&api_path("/auth/session"))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_admin_page_redirects_to_login_without_session() {
    let app = setup_test_app().await;

    let response = app.client().get("/admin/dashboard").await;

    assert!(response.status_code().is_redirection());
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_unlisted_admin_path_redirects_to_login_without_session() {
    let app = setup_test_app().await;

    for path in ["/admin", "/admin/settings", "/admin/clients/archive/2024"] {
        let response = app.client().get(path).await;
        assert!(response.status_code().is_redirection(), "{}", path);
        assert_eq!(response.header("location"), "/login", "{}", path);
    }
}

#[tokio::test]
async fn test_unlisted_admin_path_redirects_home_with_session() {
    let app = setup_test_app().await;
    let token = login(app.client()).await;

    let response = app
        .client()
        .get("/admin/settings")
        .add_header("Cookie", format!("dossier_session={}", token))
        .await;

    assert!(response.status_code().is_redirection());
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_admin_page_renders_with_session() {
    let app = setup_test_app().await;
    let token = login(app.client()).await;

    let response = app
        .client()
        .get("/admin/clients/new")
        .add_header("Cookie", format!("dossier_session={}", token))
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("data-page=\"clients/new\""));
}

#[tokio::test]
async fn test_public_pages_render() {
    let app = setup_test_app().await;

    for path in ["/", "/login", "/privacy-policy"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 200, "{} should render", path);
    }
}

#[tokio::test]
async fn test_unknown_path_redirects_home() {
    let app = setup_test_app().await;

    let response = app.client().get("/does/not/exist").await;

    assert!(response.status_code().is_redirection());
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_health_and_openapi_are_public() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["store"], "healthy");

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let spec: Value = response.json();
    assert!(spec["paths"]["/api/v1/banners"].is_object());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/live")
        .add_header("X-Request-ID", "req-123")
        .await;

    assert_eq!(response.header("x-request-id"), "req-123");
}
