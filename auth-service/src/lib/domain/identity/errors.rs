use thiserror::Error;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0} (expected user, admin or collector)")]
    Unknown(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // Domain-level errors
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Deliberately carries no detail: unknown email and wrong password are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    /// Token verified but its principal is gone.
    #[error("User not found")]
    UserNotFound,

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Password encoding failed: {0}")]
    Encoding(String),
}

impl AuthError {
    /// Whether this error is an infrastructure failure rather than a client mistake.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Store(_) | AuthError::Signing(_) | AuthError::Encoding(_)
        )
    }
}
