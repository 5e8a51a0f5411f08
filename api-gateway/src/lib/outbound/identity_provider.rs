use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::identity::errors::GatewayError;
use crate::domain::identity::models::AuthenticatedIdentity;
use crate::domain::identity::models::UpstreamReply;
use crate::domain::identity::ports::IdentityProvider;

/// IdentityProvider backed by the auth service's HTTP API.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Success envelope returned by the auth service.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

impl HttpIdentityProvider {
    /// Create a provider targeting `base_url` (e.g. `http://localhost:8081`).
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn forward(&self, path: &str, body: Vec<u8>) -> Result<UpstreamReply, GatewayError> {
        let response = self
            .client
            .post(self.url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(unavailable)?.to_vec();

        tracing::debug!(path, status, "Auth service replied");

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

fn unavailable(err: reqwest::Error) -> GatewayError {
    tracing::warn!(error = %err, "Auth service request failed");
    GatewayError::Upstream(err.to_string())
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn register(&self, body: Vec<u8>) -> Result<UpstreamReply, GatewayError> {
        self.forward("/register", body).await
    }

    async fn login(&self, body: Vec<u8>) -> Result<UpstreamReply, GatewayError> {
        self.forward("/login", body).await
    }

    async fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, GatewayError> {
        let response = self
            .client
            .post(self.url("/validate"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            StatusCode::OK => response
                .json::<Envelope<AuthenticatedIdentity>>()
                .await
                .map(|envelope| envelope.data)
                .map_err(|e| GatewayError::Upstream(format!("Malformed identity: {}", e))),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(GatewayError::InvalidToken),
            status => Err(GatewayError::Upstream(format!(
                "Unexpected status from auth service: {}",
                status
            ))),
        }
    }
}
