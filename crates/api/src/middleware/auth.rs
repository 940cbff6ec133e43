//! Bearer-token authentication.
//!
//! Handlers that take an [`AuthUser`] argument reject requests without a
//! valid access token with 401 before the handler body runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use lungrisk_core::error::CoreError;
use lungrisk_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in user making the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

fn rejected(reason: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(reason.to_string()))
}

/// The token in `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| rejected("Missing Authorization header"))?
        .to_str()
        .map_err(|_| rejected("Malformed Authorization header"))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(rejected("Expected Authorization: Bearer <token>")),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            rejected("Invalid or expired token")
        })?;

        Ok(AuthUser { user_id: claims.sub })
    }
}
