//! Shared types for the storefront platform
//!
//! Common types used by the store server and its clients: the unified
//! error system, auth/user DTOs, cart line items, and the order status
//! state machine.

pub mod cart;
pub mod client;
pub mod error;
pub mod order;

// Re-exports
pub use cart::{CartTotals, LineItem};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::OrderStatus;
pub use serde::{Deserialize, Serialize};
