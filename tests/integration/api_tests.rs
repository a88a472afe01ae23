//! API integration tests
//!
//! These run against a live server backed by a migrated database:
//! `cargo test -- --ignored`, with `BOOKSHELF_TEST_URL` pointing at it.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("BOOKSHELF_TEST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

async fn create_author(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/authors/", base_url()))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], name);
    body["id"].as_i64().expect("No author ID")
}

async fn create_book(client: &Client, title: &str, author_id: i64) -> Value {
    let response = client
        .post(format!("{}/books/", base_url()))
        .json(&json!({ "title": title, "author_id": author_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("Failed to parse response")
}

async fn delete(client: &Client, path: &str) -> StatusCode {
    client
        .delete(format!("{}{}", base_url(), path))
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_author() {
    let client = Client::new();
    let id = create_author(&client, "Ursula K. Le Guin").await;

    let response = client
        .get(format!("{}/authors/{}", base_url(), id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Ursula K. Le Guin");

    assert_eq!(delete(&client, &format!("/authors/{}", id)).await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_author_name_is_read_at_request_time() {
    let client = Client::new();
    let author_id = create_author(&client, "Tolkien").await;

    let book = create_book(&client, "The Hobbit", author_id).await;
    assert_eq!(book["title"], "The Hobbit");
    assert_eq!(book["author_id"], author_id);
    assert_eq!(book["author_name"], "Tolkien");
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .put(format!("{}/authors/{}", base_url(), author_id))
        .json(&json!({ "name": "J.R.R. Tolkien" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["author_name"], "J.R.R. Tolkien");

    assert_eq!(delete(&client, &format!("/books/{}", book_id)).await, StatusCode::OK);
    assert_eq!(delete(&client, &format!("/authors/{}", author_id)).await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_referenced_author_cannot_be_deleted() {
    let client = Client::new();
    let author_id = create_author(&client, "Frank Herbert").await;
    let book = create_book(&client, "Dune", author_id).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    assert_eq!(
        delete(&client, &format!("/authors/{}", author_id)).await,
        StatusCode::CONFLICT
    );

    // Book and author are both untouched
    let response = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["author_name"], "Frank Herbert");

    assert_eq!(delete(&client, &format!("/books/{}", book_id)).await, StatusCode::OK);
    assert_eq!(delete(&client, &format!("/authors/{}", author_id)).await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_book_with_unknown_author_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books/", base_url()))
        .json(&json!({ "title": "Orphan", "author_id": i32::MAX }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_deleted_book_disappears_from_list() {
    let client = Client::new();
    let author_id = create_author(&client, "Iain M. Banks").await;
    let book = create_book(&client, "Excession", author_id).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    assert_eq!(delete(&client, &format!("/books/{}", book_id)).await, StatusCode::OK);

    let books: Vec<Value> = client
        .get(format!("{}/books/", base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(books.iter().all(|b| b["id"] != book_id));

    let response = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(delete(&client, &format!("/books/{}", book_id)).await, StatusCode::NOT_FOUND);
    assert_eq!(delete(&client, &format!("/authors/{}", author_id)).await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_missing_author_is_not_found() {
    let client = Client::new();

    let response = client
        .put(format!("{}/authors/{}", base_url(), i32::MAX))
        .json(&json!({ "name": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
#[ignore]
async fn test_book_update_with_unknown_author_writes_nothing() {
    let client = Client::new();
    let author_id = create_author(&client, "Mary Shelley").await;
    let book = create_book(&client, "Frankenstein", author_id).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .put(format!("{}/books/{}", base_url(), book_id))
        .json(&json!({ "title": "The Last Man", "author_id": i32::MAX }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchReference");

    let body: Value = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["title"], "Frankenstein");
    assert_eq!(body["author_id"], author_id);
    assert_eq!(body["author_name"], "Mary Shelley");

    assert_eq!(delete(&client, &format!("/books/{}", book_id)).await, StatusCode::OK);
    assert_eq!(delete(&client, &format!("/authors/{}", author_id)).await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_missing_book_reported_before_missing_author() {
    let client = Client::new();

    let response = client
        .put(format!("{}/books/{}", base_url(), i32::MAX))
        .json(&json!({ "title": "Nowhere", "author_id": i32::MAX }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
#[ignore]
async fn test_deleted_author_is_not_found() {
    let client = Client::new();
    let author_id = create_author(&client, "Stanislaw Lem").await;

    assert_eq!(delete(&client, &format!("/authors/{}", author_id)).await, StatusCode::OK);

    let response = client
        .get(format!("{}/authors/{}", base_url(), author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let authors: Vec<Value> = client
        .get(format!("{}/authors/", base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(authors.iter().all(|a| a["id"] != author_id));

    assert_eq!(
        delete(&client, &format!("/authors/{}", author_id)).await,
        StatusCode::NOT_FOUND
    );
}
