//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The primary error type for the booking engine:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (remaining seats, missing fields, ...)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the kind of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Whether a presentation layer should treat this as retryable
    /// infrastructure failure rather than a business-rule rejection.
    pub fn is_infrastructure(&self) -> bool {
        self.code.category().is_infrastructure()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    /// Create an insufficient-seats error carrying the remaining count
    pub fn insufficient_seats(remaining: i32) -> Self {
        Self::with_message(
            ErrorCode::InsufficientSeats,
            format!("Not enough seats remaining: {} left", remaining),
        )
        .with_detail("remaining", remaining)
    }

    /// Create an incomplete-event error naming the missing fields
    pub fn incomplete_event(missing: &[&str]) -> Self {
        Self::with_message(
            ErrorCode::IncompleteEvent,
            format!("Event cannot be published, missing: {}", missing.join(", ")),
        )
        .with_detail(
            "missing_fields",
            missing.iter().map(|s| Value::from(*s)).collect::<Vec<_>>(),
        )
    }

    /// Create an invalid state transition error
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidStateTransition, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
