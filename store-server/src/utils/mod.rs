//! Utility module
//!
//! - [`AppError`] / [`ApiResponse`] re-exported from `shared::error`
//! - Logger setup, validation helpers, time helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message};
