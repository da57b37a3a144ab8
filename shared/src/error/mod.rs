//! Unified error system for the tessera booking platform
//!
//! - [`ErrorCode`]: standardized error codes for all error kinds
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Account errors
//! - 2xxx: Permission errors
//! - 3xxx: Event errors
//! - 4xxx: Reservation errors
//! - 8xxx: User errors
//! - 9xxx: System errors
//!
//! Business-rule failures (everything below 9xxx) are recoverable
//! conditions for the caller; 9xxx codes are infrastructure failures a
//! presentation layer may retry.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::EventNotBookable);
//!
//! let err = AppError::with_message(ErrorCode::InvalidSeatCount, "Seat count must be 1..=10");
//!
//! let err = AppError::insufficient_seats(2)
//!     .with_detail("event_id", 42);
//! ```

pub mod category;
pub mod codes;
pub mod types;

// Re-exports
pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
