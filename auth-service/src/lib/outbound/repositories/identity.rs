use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::AuthError;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of CredentialStore.
///
/// Soft-deleted rows (`deleted_at` set) are invisible to lookups but keep
/// their email reserved.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    last_login: Option<DateTime<Utc>>,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(row.id),
            email: EmailAddress::new(row.email)
                .map_err(|e| AuthError::Store(format!("Corrupt email for {}: {}", row.id, e)))?,
            password_hash: row.password_hash,
            role: row
                .role
                .parse()
                .map_err(|e| AuthError::Store(format!("Corrupt role for {}: {}", row.id, e)))?,
            last_login: row.last_login,
            profile_image: row.profile_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, email, password_hash, role, last_login, profile_image, created_at, updated_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO users (id, email, password_hash, role, last_login, profile_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, email, password_hash, role, last_login, profile_image, created_at, updated_at
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .bind(identity.last_login)
        .bind(&identity.profile_image)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return AuthError::UserExists(identity.email.to_string());
                }
            }
            AuthError::Store(e.to_string())
        })?;

        Identity::try_from(row)
    }

    async fn update_last_login(
        &self,
        id: &IdentityId,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::Store(format!("Identity {} not found", id)));
        }

        Ok(())
    }
}
