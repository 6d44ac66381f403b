//! Order API Module
//!
//! Checkout, payment and lifecycle management. Everything here needs a
//! logged-in user; listing all orders and moving status are admin only.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/", post(handler::checkout))
        .route("/myorders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", put(handler::pay));

    let admin_routes = Router::new()
        .route("/", get(handler::list_all))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
