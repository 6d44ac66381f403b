//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserCreate, UserUpdate};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// The password hash never round-trips through the User serializer,
    /// so creation goes through an explicit CREATE with binds.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = data.email.trim().to_lowercase();

        // Check duplicate email
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }

        // Hash password
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    phone = $phone,
                    address = $address,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user; None fields are left unchanged
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    phone = IF $has_phone THEN $phone ELSE phone END,
                    address = IF $has_address THEN $address ELSE address END,
                    avatar = IF $has_avatar THEN $avatar ELSE avatar END,
                    role = $role OR role,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_phone", data.phone.is_some()))
            .bind(("phone", data.phone))
            .bind(("has_address", data.address.is_some()))
            .bind(("address", data.address))
            .bind(("has_avatar", data.avatar.is_some()))
            .bind(("avatar", data.avatar))
            .bind(("role", data.role))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Replace the credential hash after the caller verified the
    /// current password
    pub async fn change_password(&self, id: &str, new_password: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let hash_pass = User::hash_password(new_password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET hash_pass = $hash_pass, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("hash_pass", hash_pass))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;
        Ok(())
    }

    /// Deactivate a user account; their orders and reviews survive
    pub async fn deactivate(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        self.base
            .db()
            .query("UPDATE $thing SET is_active = false, updated_at = $now")
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?;
        Ok(true)
    }

    /// Find all admin accounts, newest first
    pub async fn find_admins(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = 'admin' ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Count customer accounts, admins excluded
    pub async fn count_customers(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM user WHERE role = 'user' GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
