//! Admin API Handlers
//!
//! Admin accounts are off limits here: they can only be changed by their
//! owner through the profile routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserUpdate;
use crate::db::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::security_log;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::client::{AdminUpdateUserRequest, UserInfo};
use shared::order::OrderStatus;

/// List all user accounts
pub async fn list_users(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<UserInfo>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(ok(users.iter().map(|u| u.to_info()).collect()))
}

/// Update a user account (role, activation, contact details)
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> AppResult<ApiResponse<UserInfo>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref role) = payload.role
        && role != "user"
        && role != "admin"
    {
        return Err(AppError::validation(format!("Unknown role '{}'", role)));
    }

    let repo = UserRepository::new(state.get_db());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if target.is_admin() {
        security_log!("warn", "admin_modify_blocked", admin_id = %current.id, target = %id);
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }

    let user = repo
        .update(
            &id,
            UserUpdate {
                name: payload.name,
                phone: payload.phone,
                address: payload.address,
                avatar: None,
                role: payload.role,
                is_active: payload.is_active,
            },
        )
        .await?;

    tracing::info!(admin_id = %current.id, target = %id, "User updated by admin");

    Ok(ok(user.to_info()))
}

/// Deactivate a user account
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> AppResult<ApiResponse<bool>> {
    let repo = UserRepository::new(state.get_db());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if target.is_admin() {
        security_log!("warn", "admin_delete_blocked", admin_id = %current.id, target = %id);
        return Err(AppError::new(ErrorCode::CannotDeleteAdmin));
    }

    let result = repo.deactivate(&id).await?;

    security_log!("info", "user_deactivated", admin_id = %current.id, target = %id);

    Ok(ok(result))
}

/// Store-wide counters for the admin dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Customer accounts, admins excluded
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub pending_orders: i64,
    pub paid_revenue: f64,
}

/// Store stats: customer, product and order counts plus paid revenue
pub async fn stats(State(state): State<ServerState>) -> AppResult<ApiResponse<StoreStats>> {
    let users = UserRepository::new(state.get_db()).count_customers().await?;
    let products = ProductRepository::new(state.get_db()).count().await?;
    let orders_repo = OrderRepository::new(state.get_db());
    let orders = orders_repo.count().await?;
    let pending_orders = orders_repo.count_by_status(OrderStatus::Pending).await?;
    let paid_revenue = orders_repo.paid_revenue().await?;

    Ok(ok(StoreStats {
        users,
        products,
        orders,
        pending_orders,
        paid_revenue,
    }))
}
