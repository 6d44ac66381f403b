//! Authentication Handlers
//!
//! Registration, login, admin bootstrap, profile and password changes.

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserUpdate};
use crate::db::repository::{RepoError, UserRepository};
use crate::security_log;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_all, validate_email,
    validate_password, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};

use axum::extract::Path;
use shared::client::{
    ChangePasswordRequest, CreateAdminRequest, LoginRequest, LoginResponse, RegisterRequest,
    UpdateProfileRequest, UpdateRoleRequest, UserInfo,
};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Register a new customer account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    validate_all(vec![
        ("name", validate_required_text(&req.name, "name", MAX_NAME_LEN)),
        ("email", validate_email(&req.email)),
        ("password", validate_password(&req.password)),
    ])?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: "user".to_string(),
            phone: req.phone,
            address: req.address,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailExists),
            other => other.into(),
        })?;

    let token = issue_token(&state, &user.to_info())?;

    tracing::info!(email = %user.email, "User registered");

    Ok(ok(LoginResponse {
        token,
        user: user.to_info(),
    }))
}

/// Login handler
///
/// Verifies credentials and returns a JWT token. The fixed delay and
/// unified error message prevent email enumeration via timing or
/// response differences.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                security_log!("warn", "login_disabled_account", email = %req.email);
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                security_log!("warn", "login_failed", email = %req.email, reason = "invalid_credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            security_log!("warn", "login_failed", email = %req.email, reason = "unknown_email");
            return Err(AppError::invalid_credentials());
        }
    };

    let info = user.to_info();
    let token = issue_token(&state, &info)?;

    tracing::info!(user_id = %info.id, email = %info.email, "User logged in");

    Ok(ok(LoginResponse { token, user: info }))
}

/// Bootstrap an admin account
///
/// Guarded by a server-side secret key; disabled entirely when the key
/// is not configured.
pub async fn create_admin(
    State(state): State<ServerState>,
    Json(req): Json<CreateAdminRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let Some(expected) = state.config.admin_secret_key.clone() else {
        security_log!("warn", "create_admin_disabled", email = %req.email);
        return Err(AppError::new(ErrorCode::InvalidSecretKey));
    };
    if req.secret_key != expected {
        security_log!("warn", "create_admin_bad_key", email = %req.email);
        return Err(AppError::new(ErrorCode::InvalidSecretKey));
    }

    validate_all(vec![
        ("name", validate_required_text(&req.name, "name", MAX_NAME_LEN)),
        ("email", validate_email(&req.email)),
        ("password", validate_password(&req.password)),
    ])?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: "admin".to_string(),
            phone: None,
            address: None,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailExists),
            other => other.into(),
        })?;

    let info = user.to_info();
    let token = issue_token(&state, &info)?;

    security_log!("info", "admin_created", user_id = %info.id, email = %info.email);

    Ok(ok(LoginResponse { token, user: info }))
}

/// Get the authenticated user's profile
pub async fn get_profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<ApiResponse<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ok(user.to_info()))
}

/// Update the authenticated user's profile
pub async fn update_profile(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserInfo>> {
    if let Some(ref name) = req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_all(vec![
        (
            "phone",
            crate::utils::validation::validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN),
        ),
        (
            "address",
            crate::utils::validation::validate_optional_text(&req.address, "address", MAX_ADDRESS_LEN),
        ),
        (
            "avatar",
            crate::utils::validation::validate_optional_text(&req.avatar, "avatar", MAX_URL_LEN),
        ),
    ])?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .update(
            &current.id,
            UserUpdate {
                name: req.name,
                phone: req.phone,
                address: req.address,
                avatar: req.avatar,
                role: None,
                is_active: None,
            },
        )
        .await?;

    Ok(ok(user.to_info()))
}

/// Change the authenticated user's password
pub async fn change_password(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    validate_password(&req.new_password)?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    // Fixed delay, same as login
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let current_valid = user
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !current_valid {
        security_log!("warn", "change_password_failed", user_id = %current.id);
        return Err(AppError::invalid_credentials());
    }

    repo.change_password(&current.id, &req.new_password).await?;

    security_log!("info", "password_changed", user_id = %current.id);

    Ok(ok_with_message("Password updated", ()))
}

/// Deactivate the authenticated user's own account
///
/// Admin accounts cannot self-deactivate; the store must always keep
/// its administrators reachable through documented paths.
pub async fn delete_profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<ApiResponse<bool>> {
    if current.is_admin() {
        security_log!("warn", "admin_self_delete_blocked", user_id = %current.id);
        return Err(AppError::new(ErrorCode::CannotDeleteAdmin));
    }

    let repo = UserRepository::new(state.get_db());
    let result = repo.deactivate(&current.id).await?;

    security_log!("info", "account_self_deactivated", user_id = %current.id);

    Ok(ok_with_message("Account deactivated", result))
}

/// List all admin accounts
pub async fn list_admins(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<UserInfo>>> {
    let repo = UserRepository::new(state.get_db());
    let admins = repo.find_admins().await?;
    Ok(ok(admins.iter().map(|u| u.to_info()).collect()))
}

/// Change another user's role
///
/// Demoting an existing admin is rejected, the caller's own account
/// included.
pub async fn update_role(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
    Json(req): Json<UpdateRoleRequest>,
) -> AppResult<ApiResponse<UserInfo>> {
    if req.role != "user" && req.role != "admin" {
        return Err(AppError::validation(format!("Unknown role '{}'", req.role)));
    }

    let repo = UserRepository::new(state.get_db());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if target.is_admin() {
        security_log!("warn", "admin_role_change_blocked", admin_id = %current.id, target = %id);
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }

    let user = repo
        .update(
            &id,
            UserUpdate {
                name: None,
                phone: None,
                address: None,
                avatar: None,
                role: Some(req.role),
                is_active: None,
            },
        )
        .await?;

    security_log!("info", "role_changed", admin_id = %current.id, target = %id, role = %user.role);

    Ok(ok(user.to_info()))
}

/// Confirm the presented token is still valid and the account active
pub async fn verify(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<ApiResponse<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ok(user.to_info()))
}

fn issue_token(state: &ServerState, info: &UserInfo) -> AppResult<String> {
    state
        .get_jwt_service()
        .generate_token(&info.id, &info.name, &info.email, &info.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
}
