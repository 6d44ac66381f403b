//! Error type and response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error carried through handlers and middleware
///
/// Pairs an [`ErrorCode`] with a display message and optional
/// structured details (field errors, expected values, offending ids).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

/// Result alias used throughout handlers and services
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a detail entry; chainable
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // Shorthand constructors for the common cases.

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Alias for [`AppError::not_authenticated`], reads better in
    /// middleware rejections
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Response envelope shared by every endpoint
///
/// ```json
/// { "success": true,  "code": 0,    "message": "OK", "data": { ... } }
/// { "success": false, "code": 6103, "message": "...", "details": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// 0 on success, an [`ErrorCode`] value on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: Some(0),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(code = %self.code, message = %self.message, "System error");
        }

        let body = ApiResponse::<()>::error(&self);
        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = if self.success {
            StatusCode::OK
        } else {
            ErrorCode::try_from(self.code.unwrap_or(1))
                .map(|c| c.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::ProductNotFound);
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        assert_eq!(err.message, ErrorCode::ProductNotFound.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn custom_message_overrides_default() {
        let err = AppError::with_message(ErrorCode::ValidationFailed, "Price must be positive");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Price must be positive");
    }

    #[test]
    fn details_accumulate() {
        let err = AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", "Delivered")
            .with_detail("to", "Pending");

        let details = err.details.unwrap();
        assert_eq!(details.get("from").unwrap(), "Delivered");
        assert_eq!(details.get("to").unwrap(), "Pending");
    }

    #[test]
    fn shorthand_constructors_pick_the_right_code() {
        assert_eq!(
            AppError::validation("bad").code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(AppError::unauthorized().code, ErrorCode::NotAuthenticated);
        assert_eq!(
            AppError::invalid_credentials().code,
            ErrorCode::InvalidCredentials
        );
        assert_eq!(AppError::token_expired().code, ErrorCode::TokenExpired);
        assert_eq!(AppError::database("down").code, ErrorCode::DatabaseError);
        assert_eq!(AppError::internal("boom").code, ErrorCode::InternalError);

        let err = AppError::not_found("Category");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Category not found");
        assert!(err.details.unwrap().contains_key("resource"));
    }

    #[test]
    fn display_uses_the_message() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order order:9 not found");
        assert_eq!(format!("{}", err), "Order order:9 not found");
    }

    #[test]
    fn http_status_tracks_the_code() {
        assert_eq!(
            AppError::new(ErrorCode::NotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::unauthorized().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::new(ErrorCode::AdminRequired).http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn success_envelope() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert!(response.success);
        assert_eq!(response.code, Some(0));
        assert_eq!(response.message, "OK");
        assert_eq!(response.data, Some(vec![1, 2, 3]));
        assert!(response.details.is_none());

        let empty = ApiResponse::<()>::ok();
        assert!(empty.success);
        assert!(empty.data.is_none());
    }

    #[test]
    fn error_envelope_carries_code_and_details() {
        let err = AppError::new(ErrorCode::OrderTotalsMismatch).with_detail("expectedTotalPrice", 454.0);
        let response = ApiResponse::<()>::error(&err);

        assert!(!response.success);
        assert_eq!(response.code, Some(ErrorCode::OrderTotalsMismatch.code()));
        assert!(response.details.is_some());
        assert!(response.data.is_none());
    }

    #[test]
    fn from_error_conversion() {
        let response: ApiResponse<String> = AppError::new(ErrorCode::InternalError).into();
        assert!(!response.success);
        assert_eq!(response.code, Some(ErrorCode::InternalError.code()));
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let json = serde_json::to_string(&ApiResponse::success("hello")).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"hello\""));
        assert!(!json.contains("details"));

        let parsed: ApiResponse<i32> =
            serde_json::from_str(r#"{"success":true,"code":0,"message":"OK","data":42}"#).unwrap();
        assert_eq!(parsed.data, Some(42));
    }
}
