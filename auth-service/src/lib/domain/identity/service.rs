use std::sync::Arc;

use async_trait::async_trait;
use auth::password::MAX_PASSWORD_BYTES;
use chrono::Duration;
use chrono::Utc;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::identity::errors::AuthError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::CredentialStore;
use crate::identity::ports::PasswordHashing;
use crate::identity::ports::TokenCodec;

/// Default access token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Plaintext behind the decoy hash verified when no stored hash applies.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Domain service implementation for authentication.
///
/// Holds no mutable state of its own: every operation is a short transaction
/// against the credential store. Concurrent registrations of the same email
/// rely on the store's uniqueness constraint, surfaced as `UserExists`.
pub struct AuthService<CS, PH, TC>
where
    CS: CredentialStore,
    PH: PasswordHashing,
    TC: TokenCodec,
{
    store: Arc<CS>,
    password_hasher: PH,
    token_codec: TC,
    token_ttl: Duration,
    decoy_hash: Option<String>,
}

impl<CS, PH, TC> AuthService<CS, PH, TC>
where
    CS: CredentialStore,
    PH: PasswordHashing,
    TC: TokenCodec,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Identity persistence implementation
    /// * `password_hasher` - Password hashing implementation
    /// * `token_codec` - Access token signing implementation
    pub fn new(store: Arc<CS>, password_hasher: PH, token_codec: TC) -> Self {
        // Same hasher, same cost as real credentials
        let decoy_hash = password_hasher
            .hash(DECOY_PASSWORD)
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to prepare decoy password hash");
                e
            })
            .ok();

        Self {
            store,
            password_hasher,
            token_codec,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            decoy_hash,
        }
    }

    /// Override the access token lifetime.
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Pay for one password verification that can never succeed.
    ///
    /// Login failures without a stored hash to check still cost a full
    /// verification, so response time does not reveal whether an email exists.
    fn verify_decoy(&self, password: &str) {
        if let Some(decoy_hash) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, decoy_hash);
        }
    }
}

#[async_trait]
impl<CS, PH, TC> AuthServicePort for AuthService<CS, PH, TC>
where
    CS: CredentialStore,
    PH: PasswordHashing,
    TC: TokenCodec,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError> {
        match self.store.find_by_email(&command.email).await {
            Ok(Some(_)) => return Err(AuthError::UserExists(command.email.to_string())),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, email = %command.email, "Failed to check existing identity");
                return Err(e);
            }
        }

        let password_hash = self.password_hasher.hash(&command.password).map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            e
        })?;

        let identity = Identity::new(command.email, password_hash, command.role);

        // Lost race against a concurrent registration lands here as UserExists
        let created = self.store.create(identity).await.map_err(|e| {
            if e.is_internal() {
                tracing::error!(error = %e, "Failed to create identity");
            }
            e
        })?;

        tracing::info!(
            user_id = %created.id,
            email = %created.email,
            role = %created.role,
            "Identity registered"
        );

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<String, AuthError> {
        if command.password.len() > MAX_PASSWORD_BYTES {
            // Oversized input is never fed to the hasher
            self.verify_decoy("");
            tracing::info!(email = %command.email, "Login attempt with oversized password");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = match self.store.find_by_email(&command.email).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                self.verify_decoy(&command.password);
                tracing::info!(email = %command.email, "Login attempt with unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                self.verify_decoy(&command.password);
                tracing::error!(error = %e, email = %command.email, "Identity lookup failed during login");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let password_matches = self
            .password_hasher
            .verify(&command.password, &identity.password_hash)
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %identity.id, "Stored password hash is unusable");
                e
            })?;

        if !password_matches {
            tracing::info!(email = %command.email, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();

        self.store
            .update_last_login(&identity.id, now)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %identity.id, "Failed to update last login");
                e
            })?;

        let claims = auth::Claims::for_identity(
            identity.id,
            identity.email.as_str(),
            identity.role.as_str(),
            now,
            self.token_ttl,
        );

        let token = self.token_codec.issue(&claims).map_err(|e| {
            tracing::error!(error = %e, user_id = %identity.id, "Failed to sign access token");
            e
        })?;

        tracing::info!(user_id = %identity.id, email = %identity.email, "Identity logged in");

        Ok(token)
    }

    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.token_codec.verify(token, Utc::now())?;

        let email = EmailAddress::new(claims.email).map_err(|e| {
            tracing::warn!(error = %e, "Token carries a malformed email claim");
            AuthError::InvalidToken
        })?;

        // Fresh read: role and profile come from the store, not the token
        match self.store.find_by_email(&email).await? {
            Some(identity) => {
                tracing::debug!(user_id = %identity.id, "Token validated");
                Ok(identity)
            }
            None => {
                tracing::warn!(email = %email, "Token references an identity that no longer exists");
                Err(AuthError::UserNotFound)
            }
        }
    }
}
