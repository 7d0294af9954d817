//! API integration tests.
//!
//! Run against a live server seeded with the bootstrap admin (admin/admin):
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

/// A fresh 16-character ISBN for catalog fixtures
fn unique_isbn() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("978{:013}", nanos % 10_000_000_000_000)
}

/// Helper to get an authenticated admin token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to register a fresh user-role account and log it in
async fn get_user_token(client: &Client) -> String {
    let username = unique("reader");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username.as_str(),
            "password": "readerpass"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username.as_str(),
            "password": "readerpass"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let username = unique("newuser");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username.as_str(),
            "password": "somepassword"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["role"], "user");
    // The password hash must never leave the server
    assert!(body.get("password_hash").is_none());

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username.as_str(),
            "password": "somepassword"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["role"], "user");
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_username() {
    let client = Client::new();
    let username = unique("dupe");

    for expected in [200, 409] {
        let response = client
            .post(format!("{}/auth/register", BASE_URL))
            .json(&json!({
                "username": username.as_str(),
                "password": "somepassword"
            }))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_short_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": unique("shorty"),
            "password": "abc"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_login_failures_are_indistinguishable() {
    let client = Client::new();

    // Wrong password for an existing user
    let wrong_password = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "definitely-wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    // Unknown username entirely
    let unknown_user = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": unique("ghost"),
            "password": "definitely-wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    // Same generic body in both cases: no username-enumeration signal
    let a: Value = wrong_password.json().await.expect("Failed to parse response");
    let b: Value = unknown_user.json().await.expect("Failed to parse response");
    assert_eq!(a, b);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_access_is_rejected() {
    let client = Client::new();

    for path in ["/books", "/borrowers", "/loans/overdue"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 401, "expected 401 for {}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_garbage_token_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", "Bearer not.a.token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_user_role_cannot_mutate_catalog() {
    let client = Client::new();
    let token = get_user_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Forbidden Book",
            "author": "Nobody",
            "isbn": "978-0-00-000000-0",
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    // Forbidden must win over NotFound: role is checked before the resource
    let response = client
        .delete(format!("{}/books/999999999", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let isbn = unique_isbn();

    // Create
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "The Test Book",
            "author": "A. Writer",
            "isbn": isbn,
            "total_copies": 3
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_i64().expect("No book ID");
    assert_eq!(body["available_copies"], 3);
    assert_eq!(body["total_copies"], 3);

    // Update: raising total copies raises available copies by the delta
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "total_copies": 5 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_copies"], 5);
    assert_eq!(body["available_copies"], 5);

    // Delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrower_crud() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/borrowers", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Ada Reader",
            "email": format!("{}@example.com", unique("ada")),
            "phone": "+33 1 23 45 67 89"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrower_id = body["id"].as_i64().expect("No borrower ID");

    // Invalid email is rejected
    let response = client
        .put(format!("{}/borrowers/{}", BASE_URL, borrower_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "email": "not-an-email" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Partial update
    let response = client
        .put(format!("{}/borrowers/{}", BASE_URL, borrower_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Ada L. Reader" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/borrowers/{}", BASE_URL, borrower_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}
