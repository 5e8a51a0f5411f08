use auth::password::MAX_PASSWORD_BYTES;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::AuthServicePort;
use crate::identity::errors::EmailError;
use crate::identity::errors::RoleError;
use crate::inbound::http::router::AppState;

pub async fn register<AS: AuthServicePort>(
    State(state): State<AppState<AS>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let Json(body) = body?;

    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Invalid password: {0}")]
    Password(String),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;

        if self.password.is_empty() {
            return Err(ParseRegisterRequestError::Password(
                "password is required".to_string(),
            ));
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err(ParseRegisterRequestError::Password(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        // Absent role falls back to the column default
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(role) => role.parse::<Role>()?,
        };

        Ok(RegisterCommand::new(email, self.password, role))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_role_defaults_to_user() {
        let command = request("a@x.com", "pw1", None).try_into_command().unwrap();
        assert_eq!(command.role, Role::User);

        let command = request("a@x.com", "pw1", Some("")).try_into_command().unwrap();
        assert_eq!(command.role, Role::User);
    }

    #[test]
    fn test_explicit_role() {
        let command = request("a@x.com", "pw1", Some("collector"))
            .try_into_command()
            .unwrap();
        assert_eq!(command.role, Role::Collector);
    }

    #[test]
    fn test_invalid_fields() {
        assert!(matches!(
            request("not-an-email", "pw1", None).try_into_command(),
            Err(ParseRegisterRequestError::Email(_))
        ));
        assert!(matches!(
            request("a@x.com", "pw1", Some("root")).try_into_command(),
            Err(ParseRegisterRequestError::Role(_))
        ));
        assert!(matches!(
            request("a@x.com", "", None).try_into_command(),
            Err(ParseRegisterRequestError::Password(_))
        ));
    }
}
