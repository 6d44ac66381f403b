//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness and database checks
//! - [`auth`] - registration, login, profile
//! - [`products`] - catalog browsing, reviews, admin product management
//! - [`categories`] - category tree management
//! - [`orders`] - checkout, payment, order lifecycle
//! - [`admin`] - user administration and store stats

pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Merge every resource router
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        // categories sit under /api/products/categories; the static
        // segment wins over the product {id} capture
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(admin::router())
}

/// Build the application with middleware and state applied
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
