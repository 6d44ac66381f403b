//! Product Repository
//!
//! Listing is filtered and paginated in the database. Review appends
//! and stock movements run as single guarded UPDATE statements so the
//! check and the write cannot interleave with another request.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, Product, ProductCreate, ProductUpdate, Ratings, Review};
use crate::utils::time::now_millis;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Catalog listing filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring match on name, brand or description, case-insensitive
    pub keyword: Option<String>,
    /// Category record id, e.g. `category:electronics`
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Substring match on brand, case-insensitive
    pub brand: Option<String>,
    /// 1-based page number
    pub page: i64,
    pub limit: i64,
}

/// One page of catalog results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: i64,
    pub pages: i64,
    pub total: i64,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn filter_clause(filter: &ProductFilter) -> String {
        let mut clauses = vec!["is_active = true".to_string()];
        if filter.keyword.is_some() {
            clauses.push(
                "(string::lowercase(name) CONTAINS $keyword \
                 OR string::lowercase(brand) CONTAINS $keyword \
                 OR string::lowercase(description) CONTAINS $keyword)"
                    .to_string(),
            );
        }
        if filter.category.is_some() {
            clauses.push("category = $category".to_string());
        }
        if filter.subcategory.is_some() {
            clauses.push("subcategory = $subcategory".to_string());
        }
        if filter.brand.is_some() {
            clauses.push("string::lowercase(brand) CONTAINS $brand".to_string());
        }
        clauses.join(" AND ")
    }

    /// Find a page of active products matching the filter, newest first
    pub async fn find_page(&self, filter: &ProductFilter) -> RepoResult<ProductPage> {
        let limit = filter.limit.clamp(1, MAX_PAGE_SIZE);
        let page = filter.page.max(1);
        let start = (page - 1) * limit;

        // Reference fields are stored in "table:id" string form; validate
        // and normalize the filter value before binding it
        let category: Option<String> = match &filter.category {
            Some(id) => Some(parse_record_id(id)?.to_string()),
            None => None,
        };

        let clause = Self::filter_clause(filter);
        let sql = format!(
            "SELECT * FROM product WHERE {clause} ORDER BY created_at DESC LIMIT $limit START $start; \
             SELECT count() FROM product WHERE {clause} GROUP ALL"
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(keyword) = &filter.keyword {
            query = query.bind(("keyword", keyword.to_lowercase()));
        }
        if let Some(category) = category {
            query = query.bind(("category", category));
        }
        if let Some(subcategory) = &filter.subcategory {
            query = query.bind(("subcategory", subcategory.clone()));
        }
        if let Some(brand) = &filter.brand {
            query = query.bind(("brand", brand.to_lowercase()));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        let total: Option<i64> = result.take((1, "count"))?;
        let total = total.unwrap_or(0);
        let pages = (total + limit - 1) / limit;

        Ok(ProductPage {
            products,
            page,
            pages,
            total,
        })
    }

    /// Find product by id (active or not)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(id)?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find an active product by id, bumping its view counter
    pub async fn find_active_with_view(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET views += 1 WHERE is_active = true RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        let product: Option<Product> = result.take(0)?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate, added_by: &str) -> RepoResult<Product> {
        if !data.price.is_finite() || data.price <= 0.0 {
            return Err(RepoError::Validation(
                "Price must be a positive number".to_string(),
            ));
        }
        if let Some(original) = data.original_price
            && original < data.price
        {
            return Err(RepoError::Validation(
                "Original price cannot be below the current price".to_string(),
            ));
        }
        if data.images.is_empty() {
            return Err(RepoError::Validation(
                "At least one image is required".to_string(),
            ));
        }
        if data.quantity < 0 {
            return Err(RepoError::Validation(
                "Quantity cannot be negative".to_string(),
            ));
        }

        let category = parse_record_id(&data.category)?;
        let category_exists: Option<Category> = self.base.db().select(category.clone()).await?;
        if category_exists.is_none() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                data.category
            )));
        }

        let author = parse_record_id(added_by)?;
        let now = now_millis();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            original_price: data.original_price,
            category,
            subcategory: data.subcategory,
            brand: data.brand,
            images: data.images,
            specifications: data.specifications,
            features: data.features,
            tags: data.tags,
            quantity: data.quantity,
            in_stock: data.quantity > 0,
            is_active: true,
            is_featured: data.is_featured,
            reviews: Vec::new(),
            ratings: Ratings::default(),
            views: 0,
            sold: 0,
            added_by: Some(author),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create("product").content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product; None fields are left unchanged
    ///
    /// Read-modify-write keeps the merge in one place. `in_stock` is
    /// rederived whenever the quantity changes.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = parse_record_id(id)?;
        let mut existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(name) = data.name {
            existing.name = name;
        }
        if let Some(description) = data.description {
            existing.description = description;
        }
        if let Some(price) = data.price {
            if !price.is_finite() || price <= 0.0 {
                return Err(RepoError::Validation(
                    "Price must be a positive number".to_string(),
                ));
            }
            existing.price = price;
        }
        if let Some(original) = data.original_price {
            if original < existing.price {
                return Err(RepoError::Validation(
                    "Original price cannot be below the current price".to_string(),
                ));
            }
            existing.original_price = Some(original);
        }
        if let Some(category) = data.category {
            let category = parse_record_id(&category)?;
            let found: Option<Category> = self.base.db().select(category.clone()).await?;
            if found.is_none() {
                return Err(RepoError::NotFound(format!(
                    "Category {} not found",
                    category
                )));
            }
            existing.category = category;
        }
        if let Some(subcategory) = data.subcategory {
            existing.subcategory = subcategory;
        }
        if let Some(brand) = data.brand {
            existing.brand = brand;
        }
        // Submitted images extend the gallery; existing entries stay
        if let Some(images) = data.images {
            existing.images.extend(images);
        }
        if let Some(specifications) = data.specifications {
            existing.specifications = specifications;
        }
        if let Some(features) = data.features {
            existing.features = features;
        }
        if let Some(tags) = data.tags {
            existing.tags = tags;
        }
        if let Some(quantity) = data.quantity {
            if quantity < 0 {
                return Err(RepoError::Validation(
                    "Quantity cannot be negative".to_string(),
                ));
            }
            existing.quantity = quantity;
        }
        if let Some(is_featured) = data.is_featured {
            existing.is_featured = is_featured;
        }
        if let Some(is_active) = data.is_active {
            existing.is_active = is_active;
        }
        existing.in_stock = existing.quantity > 0;
        existing.updated_at = now_millis();
        existing.id = None;

        let updated: Option<Product> = self.base.db().update(thing).content(existing).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Soft delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        self.base
            .db()
            .query("UPDATE $thing SET is_active = false, updated_at = $now")
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?;
        Ok(true)
    }

    /// Append a review and refresh the rating aggregate in one guarded
    /// statement
    ///
    /// The WHERE clause rejects the write if the product is inactive or
    /// the author already reviewed it, so two concurrent submissions
    /// from the same user cannot both land.
    pub async fn add_review(&self, id: &str, review: Review) -> RepoResult<Product> {
        if !(1..=5).contains(&review.rating) {
            return Err(RepoError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let thing = parse_record_id(id)?;
        let author = review.author.to_string();
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    reviews += $review,
                    ratings.count = array::len(reviews),
                    ratings.average = math::mean(reviews.rating),
                    updated_at = $now
                WHERE is_active = true
                    AND array::len(reviews[WHERE author = $author]) = 0
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("review", review))
            .bind(("author", author))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Product> = result.take(0)?;
        match updated {
            Some(product) => Ok(product),
            None => {
                // Guard failed; tell the caller which condition tripped
                let existing = self.find_by_id(id).await?;
                match existing {
                    Some(p) if p.is_active => Err(RepoError::Duplicate(
                        "Product already reviewed by this user".to_string(),
                    )),
                    _ => Err(RepoError::NotFound(format!("Product {} not found", id))),
                }
            }
        }
    }

    /// Reserve stock for a sale; fails without writing if the product
    /// is inactive or the remaining quantity is insufficient
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> RepoResult<Product> {
        if quantity <= 0 {
            return Err(RepoError::Validation(
                "Quantity must be positive".to_string(),
            ));
        }

        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    quantity -= $qty,
                    sold += $qty,
                    in_stock = quantity > 0,
                    updated_at = $now
                WHERE is_active = true AND quantity >= $qty
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("qty", quantity))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| {
            RepoError::Validation(format!("Insufficient stock for product {}", id))
        })
    }

    /// Return previously reserved stock, e.g. after a cancelled order
    pub async fn restock(&self, id: &str, quantity: i64) -> RepoResult<()> {
        if quantity <= 0 {
            return Err(RepoError::Validation(
                "Quantity must be positive".to_string(),
            ));
        }

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    quantity += $qty,
                    sold -= $qty,
                    in_stock = quantity > 0,
                    updated_at = $now"#,
            )
            .bind(("thing", thing))
            .bind(("qty", quantity))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Count all active products
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE is_active = true GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
