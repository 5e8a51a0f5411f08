use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use crate::domain::identity::models::AuthenticatedIdentity;

/// Return the identity the authorization middleware attached to the request.
pub async fn me(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<AuthenticatedIdentity> {
    ApiSuccess::new(StatusCode::OK, identity)
}
