//! Client, year and notification API integration tests.
//!
//! Run with: `cargo test -p dossier-api --test clients_test`

mod helpers;

use helpers::{api_path, bearer, create_client, login, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_list_clients() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    let id = create_client(client, &token, "Acme Ltd").await;

    let response = client
        .get(&api_path("/clients"))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 200);
    let clients: Vec<Value> = response.json();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["id"], id.as_str());
    assert_eq!(clients[0]["name"], "Acme Ltd");
}

#[tokio::test]
async fn test_create_client_requires_name() {
    let app = setup_test_app().await;
    let token = login(app.client()).await;

    let response = app
        .client()
        .post(&api_path("/clients"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "name": "   " }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_update_client() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;
    let id = create_client(client, &token, "Acme Ltd").await;

    let response = client
        .put(&api_path(&format!("/clients/{}", id)))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "name": "Acme Holdings", "tax_id": "BE0123456789" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["name"], "Acme Holdings");
    assert_eq!(body["tax_id"], "BE0123456789");
}

#[tokio::test]
async fn test_delete_client_requires_confirmation() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;
    let id = create_client(client, &token, "Acme Ltd").await;

    let response = client
        .delete(&api_path(&format!("/clients/{}", id)))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = client
        .delete(&api_path(&format!("/clients/{}", id)))
        .add_query_param("confirm", "true")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 204);

    let response = client
        .get(&api_path(&format!("/clients/{}", id)))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_duplicate_year_is_conflict() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;
    let id = create_client(client, &token, "Acme Ltd").await;

    let years = api_path(&format!("/clients/{}/years", id));
    let response = client
        .post(&years)
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "label": "2024" }))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = client
        .post(&years)
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "label": "2024" }))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_rename_and_delete_year() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;
    let id = create_client(client, &token, "Acme Ltd").await;

    client
        .post(&api_path(&format!("/clients/{}/years", id)))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "label": "2023" }))
        .await;

    let response = client
        .put(&api_path(&format!("/clients/{}/years/2023", id)))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "label": "2024" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .delete(&api_path(&format!("/clients/{}/years/2024", id)))
        .add_query_param("confirm", "true")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 204);

    let response = client
        .get(&api_path(&format!("/clients/{}/years", id)))
        .add_header("Authorization", bearer(&token))
        .await;
    let years: Vec<Value> = response.json();
    assert!(years.is_empty());
}

#[tokio::test]
async fn test_notification_lifecycle() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;

    let response = client
        .post(&api_path("/notifications"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Deadline", "message": "Send your Q1 invoices" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let created: Value = response.json();
    assert_eq!(created["audience"]["kind"], "all");
    let id = created["id"].as_str().expect("id").to_string();

    let response = client
        .put(&api_path(&format!("/notifications/{}", id)))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Deadline", "message": "Send your Q2 invoices" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .delete(&api_path(&format!("/notifications/{}", id)))
        .add_query_param("confirm", "true")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 204);
}

#[tokio::test]
async fn test_notification_requires_title() {
    let app = setup_test_app().await;
    let token = login(app.client()).await;

    let response = app
        .client()
        .post(&api_path("/notifications"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "message": "No title" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_dashboard_counts_clients() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = login(client).await;
    create_client(client, &token, "Acme Ltd").await;
    create_client(client, &token, "Globex").await;

    let response = client
        .get(&api_path("/dashboard"))
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["clients"], 2);
}
