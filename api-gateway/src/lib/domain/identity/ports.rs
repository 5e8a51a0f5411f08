use async_trait::async_trait;

use crate::domain::identity::errors::GatewayError;
use crate::domain::identity::models::AuthenticatedIdentity;
use crate::domain::identity::models::UpstreamReply;

/// Port for the authentication service behind the gateway.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Forward a registration request body.
    ///
    /// # Returns
    /// Upstream status and body, whatever the outcome of the registration
    ///
    /// # Errors
    /// * `Upstream` - Auth service unreachable
    async fn register(&self, body: Vec<u8>) -> Result<UpstreamReply, GatewayError>;

    /// Forward a login request body.
    ///
    /// # Errors
    /// * `Upstream` - Auth service unreachable
    async fn login(&self, body: Vec<u8>) -> Result<UpstreamReply, GatewayError>;

    /// Resolve the identity behind a bearer token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token rejected or identity gone
    /// * `Upstream` - Auth service unreachable or failing
    async fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, GatewayError>;
}
