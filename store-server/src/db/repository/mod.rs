//! Repository Module
//!
//! CRUD operations for the SurrealDB tables. Handlers construct a
//! repository per request from the shared connection handle; the handle
//! is cheap to clone.

pub mod category;
pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ProductFilter, ProductPage, ProductRepository};
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: the full stack uses the "table:id" string form
// =============================================================================
//
// All IDs go through surrealdb::RecordId:
//   - parse:      let id: RecordId = "product:abc".parse()?;
//   - construct:  let id = RecordId::from_table_key("product", "abc");
//   - table name: id.table()
//   - bare key:   id.key().to_string()
//   - CRUD: db.select(id) / db.delete(id) take a RecordId directly

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:id" string into a RecordId, as a validation error
pub(crate) fn parse_record_id(id: &str) -> RepoResult<surrealdb::RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
}
