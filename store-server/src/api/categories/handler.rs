//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::{CategoryRepository, RepoError};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// List active categories
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(ok(categories))
}

/// Get a category by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(ok(category))
}

/// Create a category (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<ApiResponse<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await.map_err(map_category_error)?;
    Ok(ok(category))
}

/// Update a category (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<ApiResponse<Category>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await.map_err(map_category_error)?;
    Ok(ok(category))
}

/// Soft delete a category (admin)
///
/// Refused while active products still reference it.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    let result = repo.delete(&id).await.map_err(map_category_error)?;
    Ok(ok(result))
}

fn map_category_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(_) => AppError::new(ErrorCode::CategoryNotFound),
        RepoError::Duplicate(_) => AppError::new(ErrorCode::CategoryNameExists),
        other => other.into(),
    }
}
