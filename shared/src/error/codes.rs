//! Unified error codes for the Depot record manager
//!
//! This module defines all error codes used across the server and its
//! clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Record errors
//! - 4xxx: Stock errors
//! - 5xxx: Audit errors
//! - 6xxx: Asset errors (equipment / loans / maintenance)
//! - 8xxx: Account errors
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
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Sensitive action requires step-up re-authentication
    StepUpRequired = 1006,
    /// Sensitive action requires a justification
    ReasonRequired = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Cannot modify system account
    CannotModifySystemAccount = 2003,
    /// Cannot delete system account
    CannotDeleteSystemAccount = 2004,
    /// Cannot delete own account
    CannotDeleteSelf = 2005,

    // ==================== 3xxx: Record ====================
    /// Record not found (possibly deleted by a concurrent session)
    RecordNotFound = 3001,
    /// Record conflicts with an existing one
    RecordConflict = 3002,
    /// Unknown entity type
    UnknownEntityType = 3003,

    // ==================== 4xxx: Stock ====================
    /// Consumable not found
    ConsumableNotFound = 4001,
    /// Stock write-back failed mid-batch (compensated, retry the operation)
    StockWriteFailed = 4002,
    /// Stock compensation failed (manual reconciliation needed)
    StockCompensationFailed = 4003,
    /// Line item list is empty
    EmptyLineItems = 4004,
    /// Line item quantity is invalid
    InvalidQuantity = 4005,
    /// Line item unit price is invalid
    InvalidUnitPrice = 4006,

    // ==================== 5xxx: Audit ====================
    /// Mutation committed but the audit trail could not be written
    AuditWriteFailed = 5001,
    /// Audit log query failed
    AuditQueryFailed = 5002,
    /// Audit hash chain verification found a break
    AuditChainBroken = 5003,

    // ==================== 6xxx: Asset ====================
    /// Equipment not found
    EquipmentNotFound = 6001,
    /// Asset tag already exists
    AssetTagExists = 6002,
    /// Loan not found
    LoanNotFound = 6101,
    /// Loan has already been returned
    LoanAlreadyReturned = 6102,
    /// Maintenance ticket not found
    MaintenanceNotFound = 6201,

    // ==================== 8xxx: Account ====================
    /// Account not found
    AccountNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Serialization error
    SerializationError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::AccountDisabled => "Account has been disabled",
            ErrorCode::StepUpRequired => "This action requires re-entering your password",
            ErrorCode::ReasonRequired => "This action requires a justification",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::CannotModifySystemAccount => "System account cannot be modified",
            ErrorCode::CannotDeleteSystemAccount => "System account cannot be deleted",
            ErrorCode::CannotDeleteSelf => "You cannot delete your own account",

            // Record
            ErrorCode::RecordNotFound => "Record not found",
            ErrorCode::RecordConflict => "Record conflicts with an existing one",
            ErrorCode::UnknownEntityType => "Unknown entity type",

            // Stock
            ErrorCode::ConsumableNotFound => "Consumable not found",
            ErrorCode::StockWriteFailed => "Stock update failed, the operation was rolled back",
            ErrorCode::StockCompensationFailed => "Stock rollback failed, manual check required",
            ErrorCode::EmptyLineItems => "At least one line item is required",
            ErrorCode::InvalidQuantity => "Quantity must be a positive integer",
            ErrorCode::InvalidUnitPrice => "Unit price must not be negative",

            // Audit
            ErrorCode::AuditWriteFailed => "Change saved but the audit trail could not be written",
            ErrorCode::AuditQueryFailed => "Audit log query failed",
            ErrorCode::AuditChainBroken => "Audit chain verification found a break",

            // Asset
            ErrorCode::EquipmentNotFound => "Equipment not found",
            ErrorCode::AssetTagExists => "Asset tag already exists",
            ErrorCode::LoanNotFound => "Loan not found",
            ErrorCode::LoanAlreadyReturned => "Loan has already been returned",
            ErrorCode::MaintenanceNotFound => "Maintenance ticket not found",

            // Account
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::UsernameExists => "Username already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SerializationError => "Serialization error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
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
            1005 => Self::AccountDisabled,
            1006 => Self::StepUpRequired,
            1007 => Self::ReasonRequired,

            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,
            2003 => Self::CannotModifySystemAccount,
            2004 => Self::CannotDeleteSystemAccount,
            2005 => Self::CannotDeleteSelf,

            3001 => Self::RecordNotFound,
            3002 => Self::RecordConflict,
            3003 => Self::UnknownEntityType,

            4001 => Self::ConsumableNotFound,
            4002 => Self::StockWriteFailed,
            4003 => Self::StockCompensationFailed,
            4004 => Self::EmptyLineItems,
            4005 => Self::InvalidQuantity,
            4006 => Self::InvalidUnitPrice,

            5001 => Self::AuditWriteFailed,
            5002 => Self::AuditQueryFailed,
            5003 => Self::AuditChainBroken,

            6001 => Self::EquipmentNotFound,
            6002 => Self::AssetTagExists,
            6101 => Self::LoanNotFound,
            6102 => Self::LoanAlreadyReturned,
            6201 => Self::MaintenanceNotFound,

            8001 => Self::AccountNotFound,
            8002 => Self::UsernameExists,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9005 => Self::ConfigError,
            9006 => Self::SerializationError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InvalidCredentials,
            ErrorCode::StockWriteFailed,
            ErrorCode::AuditWriteFailed,
            ErrorCode::RecordNotFound,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "E0002");
        assert_eq!(ErrorCode::AuditWriteFailed.to_string(), "E5001");
    }
}
