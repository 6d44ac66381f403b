//! Error glue
//!
//! Re-exports the shared error types and maps repository errors into
//! [`AppError`] so handlers can use `?` across the layers.

pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Success response with data
pub fn ok<T: serde::Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}

/// Success response with a custom message
pub fn ok_with_message<T: serde::Serialize>(message: impl Into<String>, data: T) -> ApiResponse<T> {
    ApiResponse::success_with_message(message, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::NotFound("Product product:x not found".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = RepoError::Duplicate("Email taken".to_string()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::Database("boom".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let err: AppError = RepoError::Validation("bad input".to_string()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
