//! Product API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, Review, ReviewCreate};
use crate::db::repository::{
    CategoryRepository, DEFAULT_PAGE_SIZE, ProductFilter, ProductPage, ProductRepository,
    RepoError, UserRepository,
};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, MAX_URL_LEN, validate_all,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// Catalog listing query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductListQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// List active products with filters and pagination
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<ApiResponse<ProductPage>> {
    let repo = ProductRepository::new(state.get_db());
    let filter = ProductFilter {
        keyword: query.keyword.filter(|s| !s.trim().is_empty()),
        category: query.category.filter(|s| !s.trim().is_empty()),
        subcategory: query.subcategory.filter(|s| !s.trim().is_empty()),
        brand: query.brand.filter(|s| !s.trim().is_empty()),
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    };

    let page = repo.find_page(&filter).await?;
    Ok(ok(page))
}

/// Product detail with the category name resolved for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}

/// Get a product by id, counting the view
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let repo = ProductRepository::new(state.get_db());
    let mut product = repo
        .find_active_with_view(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let category_name = CategoryRepository::new(state.get_db())
        .find_by_id(&product.category.to_string())
        .await?
        .map(|c| c.name);

    // Reviews display the author's current name and avatar; the stored
    // name snapshot stands in when the account is gone. Each distinct
    // author resolves once.
    let users = UserRepository::new(state.get_db());
    let mut authors: HashMap<String, Option<(String, Option<String>)>> = HashMap::new();
    for review in &mut product.reviews {
        let key = review.author.to_string();
        if !authors.contains_key(&key) {
            let resolved = users.find_by_id(&key).await?.map(|u| (u.name, u.avatar));
            authors.insert(key.clone(), resolved);
        }
        if let Some(Some((name, avatar))) = authors.get(&key) {
            review.name = name.clone();
            review.avatar = avatar.clone();
        }
    }

    Ok(ok(ProductDetail {
        product,
        category_name,
    }))
}

/// Create a product (admin)
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<Product>> {
    validate_create(&payload)?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(payload, &current.id)
        .await
        .map_err(map_category_ref_error)?;

    tracing::info!(product_id = ?product.id, added_by = %current.id, "Product created");

    Ok(ok(product))
}

/// Update a product (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<Product>> {
    if let Some(price) = payload.price
        && (!price.is_finite() || price <= 0.0)
    {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(msg) if msg.starts_with("Product") => {
            AppError::new(ErrorCode::ProductNotFound)
        }
        other => map_category_ref_error(other),
    })?;
    Ok(ok(product))
}

/// Soft delete a product (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = ProductRepository::new(state.get_db());
    let result = repo.delete(&id).await.map_err(|e| match e {
        RepoError::NotFound(_) => AppError::new(ErrorCode::ProductNotFound),
        other => other.into(),
    })?;
    Ok(ok(result))
}

/// Submit a review for a product
///
/// One review per user per product; the rating aggregate refreshes in
/// the same write.
pub async fn add_review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<ApiResponse<Product>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::new(ErrorCode::ReviewRatingInvalid));
    }
    validate_required_text(&payload.comment, "comment", MAX_TEXT_LEN)?;

    let author = current
        .id
        .parse()
        .map_err(|_| AppError::validation("Invalid user id"))?;
    let review = Review {
        author,
        name: current.name.clone(),
        avatar: None,
        rating: payload.rating,
        comment: payload.comment,
        created_at: crate::utils::time::now_millis(),
    };

    let repo = ProductRepository::new(state.get_db());
    let product = repo.add_review(&id, review).await.map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::ProductAlreadyReviewed),
        RepoError::NotFound(_) => AppError::new(ErrorCode::ProductNotFound),
        other => other.into(),
    })?;

    Ok(ok(product))
}

/// Check every creation field, reporting all failures in one error
fn validate_create(payload: &ProductCreate) -> AppResult<()> {
    let price = if !payload.price.is_finite() || payload.price <= 0.0 {
        Err(AppError::validation("price must be a positive number"))
    } else {
        Ok(())
    };
    let original_price = match payload.original_price {
        Some(original) if original < payload.price => Err(AppError::validation(
            "originalPrice cannot be below the current price",
        )),
        _ => Ok(()),
    };
    let images = if payload.images.is_empty() {
        Err(AppError::validation("at least one image is required"))
    } else {
        payload
            .images
            .iter()
            .try_for_each(|image| validate_required_text(&image.url, "images", MAX_URL_LEN))
    };
    let quantity = if payload.quantity < 0 {
        Err(AppError::validation("quantity cannot be negative"))
    } else {
        Ok(())
    };

    validate_all(vec![
        (
            "name",
            validate_required_text(&payload.name, "name", MAX_NAME_LEN),
        ),
        (
            "description",
            validate_required_text(&payload.description, "description", MAX_TEXT_LEN),
        ),
        (
            "brand",
            validate_required_text(&payload.brand, "brand", MAX_NAME_LEN),
        ),
        (
            "subcategory",
            validate_required_text(&payload.subcategory, "subcategory", MAX_SHORT_TEXT_LEN),
        ),
        ("price", price),
        ("originalPrice", original_price),
        ("images", images),
        ("quantity", quantity),
    ])
}

fn map_category_ref_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) if msg.starts_with("Category") => {
            AppError::new(ErrorCode::CategoryNotFound)
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validation_reports_every_failing_field() {
        let payload: ProductCreate = serde_json::from_value(serde_json::json!({
            "name": "",
            "description": "A phone",
            "price": -1.0,
            "category": "category:electronics",
            "subcategory": "Phones",
            "brand": "  ",
            "images": [],
            "quantity": -3,
        }))
        .unwrap();

        let err = validate_create(&payload).unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(details.len(), 5);
        for field in ["name", "brand", "price", "images", "quantity"] {
            assert!(details.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn create_validation_accepts_a_complete_payload() {
        let payload: ProductCreate = serde_json::from_value(serde_json::json!({
            "name": "Phone",
            "description": "A phone",
            "price": 599.0,
            "originalPrice": 699.0,
            "category": "category:electronics",
            "subcategory": "Phones",
            "brand": "Acme",
            "images": ["/p.jpg"],
            "quantity": 5,
        }))
        .unwrap();

        assert!(validate_create(&payload).is_ok());
    }
}
