mod common;

use auth::Claims;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let body = app.register("a@x.com", "pw1", "user").await;

    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"]["last_login"].is_null());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "pw1", "user").await;

    let response = app
        .post("/register")
        .json(&json!({ "email": "a@x.com", "password": "pw2", "role": "user" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({ "email": "not-an-email", "password": "pw1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("email"));
}

#[tokio::test]
async fn test_register_unknown_role() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/register")
        .json(&json!({ "email": "a@x.com", "password": "pw1", "role": "root" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_token_carries_identity_claims() {
    let app = TestApp::spawn().await;
    app.register("c@x.com", "pw1", "collector").await;

    let token = app.login("c@x.com", "pw1").await;

    let claims = app.jwt_handler.decode(&token, Utc::now()).unwrap();
    assert_eq!(claims.email, "c@x.com");
    assert_eq!(claims.role, "collector");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "pw1", "user").await;

    let wrong_password = app
        .post("/login")
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");
    let unknown_email = app
        .post("/login")
        .json(&json!({ "email": "nobody@x.com", "password": "pw1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_email: serde_json::Value = unknown_email.json().await.unwrap();
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_validate_rejects_expired_token() {
    let app = TestApp::spawn().await;
    let body = app.register("a@x.com", "pw1", "user").await;

    let issued = Utc::now() - Duration::hours(48);
    let claims = Claims::for_identity(
        body["data"]["id"].as_str().unwrap(),
        "a@x.com",
        "user",
        issued,
        Duration::hours(24),
    );
    let token = app.jwt_handler.encode(&claims).unwrap();

    let response = app.validate(&token).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validate_rejects_foreign_and_unsigned_tokens() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "pw1", "user").await;
    let token = app.login("a@x.com", "pw1").await;

    let foreign = auth::JwtHandler::new(b"some-other-secret-at-least-32-bytes!!")
        .encode(&app.jwt_handler.decode(&token, Utc::now()).unwrap())
        .unwrap();
    let response = app.validate(&foreign).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // {"alg":"none","typ":"JWT"} with the genuine payload and no signature
    let payload = token.split('.').nth(1).unwrap();
    let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
    let response = app.validate(&unsigned).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validate_vanished_identity_looks_like_invalid_token() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "pw1", "user").await;
    let token = app.login("a@x.com", "pw1").await;

    let garbage = app.validate("garbage").send().await.unwrap();
    let garbage_status = garbage.status();
    let garbage: serde_json::Value = garbage.json().await.unwrap();

    let email = auth_service::identity::models::EmailAddress::new("a@x.com".to_string()).unwrap();
    app.store.remove(&email).expect("identity should exist");

    let vanished = app.validate(&token).send().await.unwrap();
    assert_eq!(vanished.status(), garbage_status);
    assert_eq!(vanished.status(), StatusCode::UNAUTHORIZED);

    let vanished: serde_json::Value = vanished.json().await.unwrap();
    assert_eq!(vanished, garbage);
}

#[tokio::test]
async fn test_validate_reflects_current_role() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "pw1", "user").await;
    let token = app.login("a@x.com", "pw1").await;

    let email = auth_service::identity::models::EmailAddress::new("a@x.com".to_string()).unwrap();
    assert!(app.store.modify(&email, |identity| {
        identity.role = auth_service::identity::models::Role::Admin
    }));

    let response = app.validate(&token).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["role"], "admin");

    // The token itself still says what it said at issuance
    let claims = app.jwt_handler.decode(&token, Utc::now()).unwrap();
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_register_login_validate_scenario() {
    let app = TestApp::spawn().await;

    // Register("a@x.com","pw1","user") -> 201
    app.register("a@x.com", "pw1", "user").await;

    // Login("a@x.com","pw1") -> token T
    let token = app.login("a@x.com", "pw1").await;

    // ValidateToken(T) -> identity with email "a@x.com", role "user"
    let response = app.validate(&token).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"]["last_login"].is_string());
    assert!(body["data"].get("password_hash").is_none());

    // Login("a@x.com","wrong") -> 401 InvalidCredentials
    let response = app
        .post("/login")
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid credentials");

    // Register("a@x.com","pw2","user") -> 400 UserExists
    let response = app
        .post("/register")
        .json(&json!({ "email": "a@x.com", "password": "pw2", "role": "user" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_oversized_password_looks_like_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "pw1", "user").await;

    let oversized = app
        .post("/login")
        .json(&json!({ "email": "a@x.com", "password": "p".repeat(2048) }))
        .send()
        .await
        .unwrap();
    assert_eq!(oversized.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = oversized.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid credentials");
}
