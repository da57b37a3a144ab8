//! Unified error codes for the tessera booking platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Account errors
//! - 2xxx: Permission errors
//! - 3xxx: Event errors
//! - 4xxx: Reservation errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility.
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

    // ==================== 1xxx: Account ====================
    /// Account is disabled
    AccountDisabled = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Event ====================
    /// Event not found
    EventNotFound = 3001,
    /// Event is missing fields required for publishing
    IncompleteEvent = 3002,
    /// Event is finished or cancelled and no longer editable
    EventClosed = 3003,
    /// Event still has reservations and cannot be deleted
    EventHasReservations = 3004,
    /// Event is not open for booking
    EventNotBookable = 3005,
    /// Event has already ended
    EventAlreadyEnded = 3006,
    /// Capacity cannot drop below currently occupied seats
    CapacityBelowOccupied = 3007,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Seat count is out of the allowed range
    InvalidSeatCount = 4002,
    /// Not enough seats remaining
    InsufficientSeats = 4003,
    /// Cancellation window has closed
    CancellationWindowClosed = 4004,
    /// Reservation state does not allow this transition
    InvalidStateTransition = 4005,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// Reservation code space exhausted
    CodeSpaceExhausted = 9101,
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

            // Account
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Event
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::IncompleteEvent => "Event is missing fields required for publishing",
            ErrorCode::EventClosed => "Event is finished or cancelled and can no longer be edited",
            ErrorCode::EventHasReservations => "Event still has reservations",
            ErrorCode::EventNotBookable => "Event is not open for booking",
            ErrorCode::EventAlreadyEnded => "Event has already ended",
            ErrorCode::CapacityBelowOccupied => {
                "Capacity cannot be lowered below currently occupied seats"
            }

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::InvalidSeatCount => "Seat count is out of the allowed range",
            ErrorCode::InsufficientSeats => "Not enough seats remaining",
            ErrorCode::CancellationWindowClosed => "Cancellation window has closed",
            ErrorCode::InvalidStateTransition => "State does not allow this transition",

            // User
            ErrorCode::UserNotFound => "User not found",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::CodeSpaceExhausted => "Reservation code space exhausted",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
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
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Account
            1001 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Event
            3001 => Ok(ErrorCode::EventNotFound),
            3002 => Ok(ErrorCode::IncompleteEvent),
            3003 => Ok(ErrorCode::EventClosed),
            3004 => Ok(ErrorCode::EventHasReservations),
            3005 => Ok(ErrorCode::EventNotBookable),
            3006 => Ok(ErrorCode::EventAlreadyEnded),
            3007 => Ok(ErrorCode::CapacityBelowOccupied),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::InvalidSeatCount),
            4003 => Ok(ErrorCode::InsufficientSeats),
            4004 => Ok(ErrorCode::CancellationWindowClosed),
            4005 => Ok(ErrorCode::InvalidStateTransition),

            // User
            8001 => Ok(ErrorCode::UserNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9101 => Ok(ErrorCode::CodeSpaceExhausted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
