//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the range of the error code:
/// - 0xxx: General errors
/// - 1xxx: Account errors
/// - 2xxx: Permission errors
/// - 3xxx: Event errors
/// - 4xxx: Reservation errors
/// - 8xxx: User errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Account errors (1xxx)
    Account,
    /// Permission errors (2xxx)
    Permission,
    /// Event errors (3xxx)
    Event,
    /// Reservation errors (4xxx)
    Reservation,
    /// User errors (8xxx)
    User,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Account,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Event,
            4000..5000 => Self::Reservation,
            8000..9000 => Self::User,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Account => "account",
            Self::Permission => "permission",
            Self::Event => "event",
            Self::Reservation => "reservation",
            Self::User => "user",
            Self::System => "system",
        }
    }

    /// Infrastructure failures are retryable; business-rule failures
    /// are not (the caller must change the request).
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(3), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Account);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3005), ErrorCategory::Event);
        assert_eq!(ErrorCategory::from_code(4003), ErrorCategory::Reservation);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::User);
        assert_eq!(ErrorCategory::from_code(9101), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::InsufficientSeats.category(), ErrorCategory::Reservation);
        assert_eq!(ErrorCode::CodeSpaceExhausted.category(), ErrorCategory::System);
    }

    #[test]
    fn test_is_infrastructure() {
        assert!(ErrorCode::StorageError.category().is_infrastructure());
        assert!(ErrorCode::CodeSpaceExhausted.category().is_infrastructure());
        assert!(!ErrorCode::InsufficientSeats.category().is_infrastructure());
        assert!(!ErrorCode::PermissionDenied.category().is_infrastructure());
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::Event.name(), "event");
        assert_eq!(ErrorCategory::System.name(), "system");
    }
}
