//! Admin API Module
//!
//! User administration and store-wide stats. Every route requires the
//! admin role.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Admin router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route(
            "/users/{id}",
            put(handler::update_user).delete(handler::delete_user),
        )
        .route("/stats", get(handler::stats))
        .layer(middleware::from_fn(require_admin))
}
