//! Database models
//!
//! Entity structs matching the SurrealDB schema, plus their create and
//! update payloads.
//!
//! ID convention: the whole stack uses the `"table:id"` string format.
//! `surrealdb::RecordId` handles parsing and construction; the
//! [`serde_helpers`] module keeps the wire format stable.

pub mod category;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryUpdate, Subcategory};
pub use order::{AdminResponse, Order, OrderCreate, ShippingAddress, StatusUpdate};
pub use product::{Product, ProductCreate, ProductImage, ProductUpdate, Ratings, Review, ReviewCreate};
pub use user::{User, UserCreate, UserUpdate};
