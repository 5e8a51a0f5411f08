//! Bindings of the `auth` primitives to the domain's hashing and token ports.

use auth::JwtError;
use auth::JwtHandler;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;

use crate::identity::errors::AuthError;
use crate::identity::ports::PasswordHashing;
use crate::identity::ports::TokenCodec;

impl PasswordHashing for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        PasswordHasher::hash(self, password).map_err(|e| AuthError::Encoding(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        PasswordHasher::verify(self, password, hash)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }
}

impl TokenCodec for JwtHandler {
    fn issue(&self, claims: &auth::Claims) -> Result<String, AuthError> {
        self.encode(claims).map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<auth::Claims, AuthError> {
        self.decode(token, now).map_err(|e| {
            if e == JwtError::EmptySecret {
                tracing::error!(error = %e, "Token verification attempted without a secret");
            } else {
                tracing::info!(error = %e, "Token rejected");
            }
            AuthError::InvalidToken
        })
    }
}
