//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RecordNotFound
            | Self::ConsumableNotFound
            | Self::EquipmentNotFound
            | Self::LoanNotFound
            | Self::MaintenanceNotFound
            | Self::AccountNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::RecordConflict
            | Self::AssetTagExists
            | Self::LoanAlreadyReturned
            | Self::UsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled
            | Self::StepUpRequired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::CannotModifySystemAccount
            | Self::CannotDeleteSystemAccount
            | Self::CannotDeleteSelf => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::SerializationError
            | Self::StockCompensationFailed
            | Self::AuditWriteFailed
            | Self::AuditQueryFailed
            | Self::AuditChainBroken => StatusCode::INTERNAL_SERVER_ERROR,

            // 503 Service Unavailable (transient, client can retry the whole operation)
            Self::StockWriteFailed => StatusCode::SERVICE_UNAVAILABLE,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_statuses_for_the_error_taxonomy() {
        assert_eq!(ErrorCode::InvalidCredentials.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::RecordNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::StockWriteFailed.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ErrorCode::AuditWriteFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
