//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Record errors
/// - 4xxx: Stock errors
/// - 5xxx: Audit errors
/// - 6xxx: Asset errors
/// - 8xxx: Account errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Record errors (3xxx)
    Record,
    /// Stock errors (4xxx)
    Stock,
    /// Audit errors (5xxx)
    Audit,
    /// Asset errors (6xxx)
    Asset,
    /// Account errors (8xxx)
    Account,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Record,
            4000..5000 => Self::Stock,
            5000..6000 => Self::Audit,
            6000..7000 => Self::Asset,
            8000..9000 => Self::Account,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    /// Get the category of this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_code_ranges() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::InvalidCredentials.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::RecordNotFound.category(), ErrorCategory::Record);
        assert_eq!(ErrorCode::StockWriteFailed.category(), ErrorCategory::Stock);
        assert_eq!(ErrorCode::AuditWriteFailed.category(), ErrorCategory::Audit);
        assert_eq!(ErrorCode::LoanNotFound.category(), ErrorCategory::Asset);
        assert_eq!(ErrorCode::UsernameExists.category(), ErrorCategory::Account);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }
}
