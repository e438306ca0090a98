//! Error re-exports and response helpers
//!
//! The canonical error types live in `shared::error`; this module re-exports
//! them and adds the small success-envelope helpers the handlers use.

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Wrap a payload in the unified success envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Wrap a payload in the unified success envelope with a custom message
pub fn ok_with_message<T: Serialize>(message: &str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
