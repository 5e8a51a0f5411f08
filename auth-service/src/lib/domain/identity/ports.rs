use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::identity::errors::AuthError;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, password, and role
    ///
    /// # Returns
    /// Created identity (callers must not expose its password hash)
    ///
    /// # Errors
    /// * `UserExists` - Email is already registered
    /// * `Encoding` - Password hashing failed
    /// * `Store` - Storage operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError>;

    /// Authenticate credentials and issue an access token.
    ///
    /// # Returns
    /// Signed bearer token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Encoding` - Stored password hash is malformed
    /// * `Store` - Recording the login failed
    /// * `Signing` - Token generation failed
    async fn login(&self, command: LoginCommand) -> Result<String, AuthError>;

    /// Validate a bearer token and resolve the current identity behind it.
    ///
    /// # Returns
    /// Identity as currently stored (not as it was at issuance)
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, algorithm, claims, or expired
    /// * `UserNotFound` - Token is valid but the identity no longer exists
    /// * `Store` - Storage operation failed
    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Persistence operations for identity records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve identity by email address.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `UserExists` - Email uniqueness constraint violated
    /// * `Store` - Storage operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Record a successful login.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed or identity no longer exists
    async fn update_last_login(&self, id: &IdentityId, at: DateTime<Utc>)
        -> Result<(), AuthError>;
}

/// One-way password hashing.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a plaintext password with a fresh salt.
    ///
    /// # Errors
    /// * `Encoding` - Input rejected or hashing failed
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// # Returns
    /// `false` on mismatch
    ///
    /// # Errors
    /// * `Encoding` - Stored hash is structurally invalid
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Signed access token issuance and verification.
pub trait TokenCodec: Send + Sync + 'static {
    /// Sign claims into a bearer token.
    ///
    /// # Errors
    /// * `Signing` - Secret unusable or signing failed
    fn issue(&self, claims: &auth::Claims) -> Result<String, AuthError>;

    /// Verify a bearer token at `now`.
    ///
    /// # Errors
    /// * `InvalidToken` - Token rejected for any reason
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<auth::Claims, AuthError>;
}
