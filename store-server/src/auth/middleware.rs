//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role checks.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::AppError;
use shared::ErrorCode;

/// Auth middleware - requires a logged-in user
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then re-reads the account from the database so that deactivated users
/// are locked out immediately rather than at token expiry. On success a
/// [`CurrentUser`] is injected into request extensions.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (health check included)
/// - `/api/auth/login`, `/api/auth/register`, `/api/auth/create-admin`
/// - `GET` requests under `/api/products` (public catalog browsing)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight skips auth
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes skip auth (they 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("warn", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let claims = match jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "warn",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            return match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    // Fresh account lookup: a valid token for a deleted or deactivated
    // account must not pass.
    let repo = UserRepository::new(state.get_db());
    let account = repo
        .find_by_id(&claims.sub)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let account = match account {
        Some(u) => u,
        None => {
            security_log!("warn", "auth_stale_account", user_id = claims.sub.clone());
            return Err(AppError::unauthorized());
        }
    };
    if !account.is_active {
        security_log!("warn", "auth_disabled_account", user_id = claims.sub.clone());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    // Role comes from the database, not the token, so demotions take
    // effect without waiting for token expiry.
    let user = CurrentUser {
        id: claims.sub,
        name: account.name,
        email: account.email,
        role: account.role,
    };
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Routes reachable without a token
fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/auth/login"
        || path == "/api/auth/register"
        || path == "/api/auth/create-admin"
    {
        return true;
    }

    // Catalog browsing is public: products, categories, reviews (reads only)
    if method == http::Method::GET
        && (path == "/api/products" || path.starts_with("/api/products/"))
    {
        return true;
    }

    false
}

/// Admin middleware - requires `role == "admin"`
///
/// Layered on admin sub-routers after `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "warn",
            "admin_required",
            user_id = user.id.clone(),
            email = user.email.clone()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
