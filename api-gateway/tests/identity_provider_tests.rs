use std::time::Duration;

use api_gateway::identity::errors::GatewayError;
use api_gateway::identity::ports::IdentityProvider;
use api_gateway::outbound::identity_provider::HttpIdentityProvider;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;

/// Stand-in for the auth service with canned replies.
fn auth_service_stub() -> Router {
    Router::new()
        .route(
            "/register",
            post(|body: String| async move {
                (
                    StatusCode::CREATED,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }),
        )
        .route(
            "/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "status_code": 401,
                        "data": { "message": "Invalid credentials" }
                    })),
                )
            }),
        )
        .route("/validate", post(validate))
}

async fn validate(headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match token {
        "Bearer good" => Json(json!({
            "status_code": 200,
            "data": {
                "id": "6f1c2b0e-8a3d-4d4e-9b8a-2f0c1d2e3f40",
                "email": "a@x.com",
                "role": "user",
                "last_login": "2024-06-01T12:00:00Z",
                "profile_image": null,
                "created_at": "2024-06-01T10:00:00Z",
                "updated_at": "2024-06-01T12:00:00Z"
            }
        }))
        .into_response(),
        "Bearer broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status_code": 401, "data": { "message": "Invalid token" } })),
        )
            .into_response(),
    }
}

async fn spawn_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, auth_service_stub())
            .await
            .expect("Server error");
    });

    address
}

fn provider(address: &str) -> HttpIdentityProvider {
    HttpIdentityProvider::new(address, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_validate_resolves_identity() {
    let address = spawn_stub().await;

    let identity = provider(&address).validate("good").await.unwrap();

    assert_eq!(identity.email, "a@x.com");
    assert_eq!(identity.role, "user");
    assert!(identity.last_login.is_some());
    assert_eq!(identity.profile_image, None);
}

#[tokio::test]
async fn test_validate_rejected_token() {
    let address = spawn_stub().await;

    let result = provider(&address).validate("forged").await;

    assert_eq!(result, Err(GatewayError::InvalidToken));
}

#[tokio::test]
async fn test_validate_upstream_failure() {
    let address = spawn_stub().await;

    let result = provider(&address).validate("broken").await;

    assert!(matches!(result, Err(GatewayError::Upstream(_))));
}

#[tokio::test]
async fn test_validate_unreachable_auth_service() {
    // Reserve a port, then free it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = provider(&address).validate("good").await;

    assert!(matches!(result, Err(GatewayError::Upstream(_))));
}

#[tokio::test]
async fn test_register_is_relayed_verbatim() {
    let address = spawn_stub().await;
    let body = br#"{"email":"a@x.com","password":"pw1"}"#.to_vec();

    let reply = provider(&address).register(body.clone()).await.unwrap();

    assert_eq!(reply.status, 201);
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    assert_eq!(reply.body, body);
}

#[tokio::test]
async fn test_login_failure_status_is_relayed() {
    let address = spawn_stub().await;

    let reply = provider(&address)
        .login(br#"{"email":"a@x.com","password":"wrong"}"#.to_vec())
        .await
        .unwrap();

    assert_eq!(reply.status, 401);
    let body: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
    assert_eq!(body["data"]["message"], "Invalid credentials");
}
