use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Carries the identity a token was issued for. Claims are never updated
/// after issuance; consumers that need current data re-read it from storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Email address of the identity at issuance time
    #[serde(default)]
    pub email: String,

    /// Role of the identity at issuance time
    #[serde(default)]
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Unique identity identifier
    /// * `email` - Identity email address
    /// * `role` - Identity role name
    /// * `now` - Issuance instant
    /// * `ttl` - Token lifetime
    pub fn for_identity(
        subject: impl ToString,
        email: impl Into<String>,
        role: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            email: email.into(),
            role: role.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the instant of its `exp` claim.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
