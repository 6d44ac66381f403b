//! Store Server - storefront REST API backend
//!
//! # Architecture
//!
//! - **Database** (`db`): embedded SurrealDB storage, repository layer
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **Pricing** (`pricing`): cart totals derivation with Decimal arithmetic
//! - **HTTP API** (`api`): RESTful interface (catalog, orders, users)
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT auth, middleware, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── pricing/       # cart totals calculator
//! └── utils/         # logging, validation, error glue
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod pricing;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use pricing::{Cart, compute_totals};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - tracing with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($fields:tt)*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($fields)*
        );
    };
}
