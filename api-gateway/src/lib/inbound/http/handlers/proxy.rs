use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

use super::ApiError;
use crate::domain::identity::models::UpstreamReply;
use crate::domain::identity::ports::IdentityProvider;
use crate::inbound::http::router::AppState;

pub async fn register<IP: IdentityProvider>(
    State(state): State<AppState<IP>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let reply = state.identity_provider.register(body.to_vec()).await?;
    Ok(relay(reply))
}

pub async fn login<IP: IdentityProvider>(
    State(state): State<AppState<IP>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let reply = state.identity_provider.login(body.to_vec()).await?;
    Ok(relay(reply))
}

/// Turn an upstream reply into a response with the same status, type and body.
fn relay(reply: UpstreamReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, reply.body).into_response();

    match reply
        .content_type
        .and_then(|value| HeaderValue::from_str(&value).ok())
    {
        Some(content_type) => {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }

    response
}
