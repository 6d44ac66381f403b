//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let thing = parse_record_id(id)?;
        let category: Option<Category> = self.base.db().select(thing).await?;
        Ok(category)
    }

    /// Find category by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let category = Category {
            id: None,
            name: data.name,
            description: data.description,
            image: data.image,
            subcategories: data.subcategories,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Category> = self.base.db().create("category").content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category; None fields are left unchanged
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let thing = parse_record_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    description = IF $has_description THEN $description ELSE description END,
                    image = IF $has_image THEN $image ELSE image END,
                    subcategories = IF $has_subcategories THEN $subcategories ELSE subcategories END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_description", data.description.is_some()))
            .bind(("description", data.description))
            .bind(("has_image", data.image.is_some()))
            .bind(("image", data.image))
            .bind(("has_subcategories", data.subcategories.is_some()))
            .bind(("subcategories", data.subcategories))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Category>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Soft delete a category
    ///
    /// Refused while active products still reference it.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM product WHERE category = $cat AND is_active = true GROUP ALL",
            )
            .bind(("cat", thing.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;

        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Cannot delete category with active products".to_string(),
            ));
        }

        self.base
            .db()
            .query("UPDATE $thing SET is_active = false, updated_at = $now")
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?;

        Ok(true)
    }
}
