use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::me::me;
use super::handlers::proxy::login;
use super::handlers::proxy::register;
use super::middleware::require_identity;
use crate::domain::identity::ports::IdentityProvider;

pub struct AppState<IP: IdentityProvider> {
    pub identity_provider: Arc<IP>,
}

impl<IP: IdentityProvider> Clone for AppState<IP> {
    fn clone(&self) -> Self {
        Self {
            identity_provider: Arc::clone(&self.identity_provider),
        }
    }
}

pub fn create_router<IP: IdentityProvider>(identity_provider: Arc<IP>) -> Router {
    let state = AppState { identity_provider };

    let public_routes = Router::new()
        .route("/auth/register", post(register::<IP>))
        .route("/auth/login", post(login::<IP>));

    let protected_routes = Router::new()
        .route("/users/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity::<IP>,
        ));

    // Authorization headers stay out of the span
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}
