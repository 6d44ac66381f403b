//! Unified error codes for the storefront platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot modify admin account (demote / deactivate)
    CannotModifyAdmin = 2004,
    /// Cannot delete admin account
    CannotDeleteAdmin = 2005,
    /// Invalid admin secret key
    InvalidSecretKey = 2006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order is empty
    OrderEmpty = 4007,
    /// Submitted totals do not match server recomputation
    OrderTotalsMismatch = 4008,
    /// Requested status transition is not a legal edge
    InvalidStatusTransition = 4009,
    /// Unknown order status value
    InvalidOrderStatus = 4010,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Product already reviewed by this user
    ProductAlreadyReviewed = 6004,
    /// Review rating outside 1..=5
    ReviewRatingInvalid = 6005,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category name already exists
    CategoryNameExists = 6103,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Email already registered
    EmailExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account has been disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::CannotModifyAdmin => "Cannot modify admin account",
            Self::CannotDeleteAdmin => "Cannot delete admin account",
            Self::InvalidSecretKey => "Invalid secret key for admin creation",

            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyPaid => "Order has already been paid",
            Self::OrderEmpty => "Order has no items",
            Self::OrderTotalsMismatch => "Order totals do not match server calculation",
            Self::InvalidStatusTransition => "Illegal order status transition",
            Self::InvalidOrderStatus => "Unknown order status",

            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Price must be a valid positive number",
            Self::ProductOutOfStock => "Product is out of stock",
            Self::ProductAlreadyReviewed => "Product already reviewed",
            Self::ReviewRatingInvalid => "Rating must be between 1 and 5",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryNameExists => "Category name already exists",

            Self::UserNotFound => "User not found",
            Self::EmailExists => "Email already registered",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1007 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2003 => Self::AdminRequired,
            2004 => Self::CannotModifyAdmin,
            2005 => Self::CannotDeleteAdmin,
            2006 => Self::InvalidSecretKey,

            4001 => Self::OrderNotFound,
            4002 => Self::OrderAlreadyPaid,
            4007 => Self::OrderEmpty,
            4008 => Self::OrderTotalsMismatch,
            4009 => Self::InvalidStatusTransition,
            4010 => Self::InvalidOrderStatus,

            6001 => Self::ProductNotFound,
            6002 => Self::ProductInvalidPrice,
            6003 => Self::ProductOutOfStock,
            6004 => Self::ProductAlreadyReviewed,
            6005 => Self::ReviewRatingInvalid,
            6101 => Self::CategoryNotFound,
            6103 => Self::CategoryNameExists,

            8001 => Self::UserNotFound,
            8002 => Self::EmailExists,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::CannotDeleteAdmin.code(), 2005);
        assert_eq!(ErrorCode::ProductAlreadyReviewed.code(), 6004);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidCredentials,
            ErrorCode::OrderTotalsMismatch,
            ErrorCode::CategoryNameExists,
            ErrorCode::EmailExists,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            ErrorCode::ProductAlreadyReviewed.message(),
            "Product already reviewed"
        );
    }
}
