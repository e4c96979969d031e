use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use crate::inbound::http::middleware::AccessClaims;

/// Echo the verified claims of the caller's access token.
pub async fn me(
    Extension(AccessClaims(claims)): Extension<AccessClaims>,
) -> ApiSuccess<auth::Claims> {
    ApiSuccess::new(StatusCode::OK, claims)
}
