//! Category API Module
//!
//! Nested under /api/products/categories so the storefront can fetch
//! the tree alongside the catalog. The static `categories` segment
//! takes precedence over the product `{id}` capture.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Category router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products/categories", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
