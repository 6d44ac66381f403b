//! Auth API Module
//!
//! Registration, login, admin bootstrap and profile management.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Auth router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes().merge(admin_routes()))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/create-admin", post(handler::create_admin))
        .route(
            "/profile",
            get(handler::get_profile)
                .put(handler::update_profile)
                .delete(handler::delete_profile),
        )
        .route("/change-password", put(handler::change_password))
        .route("/verify", get(handler::verify))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/admins", get(handler::list_admins))
        .route("/users/{id}/role", put(handler::update_role))
        .layer(middleware::from_fn(require_admin))
}
