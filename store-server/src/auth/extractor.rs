//! Handler-level user extraction
//!
//! [`CurrentUser`] is normally placed in request extensions by the
//! auth middleware; the extractor just clones it out. When a handler
//! sits outside the middleware stack the extractor falls back to
//! validating the bearer token itself.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(parts)?;

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(
                "warn",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let user = CurrentUser::from(claims);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match header {
        Some(value) => JwtService::extract_from_header(value)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header")),
        None => {
            security_log!("warn", "auth_missing", uri = format!("{:?}", parts.uri));
            Err(AppError::unauthorized())
        }
    }
}
