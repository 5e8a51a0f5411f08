use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The auth service rejected the token or the identity behind it.
    #[error("Invalid token")]
    InvalidToken,

    /// The auth service could not be reached or answered unexpectedly.
    #[error("Auth service unavailable: {0}")]
    Upstream(String),
}
