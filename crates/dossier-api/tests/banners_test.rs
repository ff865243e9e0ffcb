//! Banner API integration tests.
//!
//! Run with: `cargo test -p dossier-api --test banners_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{create_minimal_png, create_png_of_size};
use helpers::{api_path, bearer, login, setup_test_app};
use serde_json::Value;

const FIVE_MB: usize = 5 * 1024 * 1024;

fn banner_form(name: &str, image: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_text("name", name).add_part(
        "file",
        Part::bytes(image).file_name("banner.png").mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_create_banner_derives_key() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    let response = client
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(banner_form("Q1 Promo!", create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 201);
    let banner: Value = response.json();
    assert_eq!(banner["id"], "q1_promo");
    assert_eq!(banner["name"], "Q1 Promo!");
    assert_eq!(banner["active"], true);
}

#[tokio::test]
async fn test_names_with_same_key_are_duplicates() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    let response = client
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(banner_form("Q1 Promo!", create_minimal_png()))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = client
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(banner_form("q1 promo", create_minimal_png()))
        .await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap_or_default().contains("q1_promo"));

    let banners: Vec<Value> = client
        .get(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(banners.len(), 1);
}

#[tokio::test]
async fn test_banner_image_size_limit() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    let response = client
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(banner_form("Too big", create_png_of_size(FIVE_MB + 1)))
        .await;
    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap_or_default().contains("5 MB"));

    let response = client
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(banner_form("Just right", create_png_of_size(FIVE_MB)))
        .await;
    assert_eq!(response.status_code(), 201);
}

#[tokio::test]
async fn test_banner_requires_image_type() {
    let app = setup_test_app().await;
    let token = login(app.client()).await;

    let form = MultipartForm::new().add_text("name", "Flyer").add_part(
        "file",
        Part::bytes(b"%PDF-1.4".to_vec())
            .file_name("flyer.pdf")
            .mime_type("application/pdf"),
    );
    let response = app
        .client()
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn test_toggle_banner_and_delete() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    client
        .post(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .multipart(banner_form("Spring sale", create_minimal_png()))
        .await;

    let response = client
        .put(&api_path("/banners/spring_sale"))
        .add_header("Authorization", bearer(&token))
        .multipart(MultipartForm::new().add_text("active", "false"))
        .await;
    assert_eq!(response.status_code(), 200);
    let banner: Value = response.json();
    assert_eq!(banner["active"], false);

    let response = client
        .delete(&api_path("/banners/spring_sale"))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = client
        .delete(&api_path("/banners/spring_sale"))
        .add_query_param("confirm", "true")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 204);

    let banners: Vec<Value> = client
        .get(&api_path("/banners"))
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert!(banners.is_empty());
}
