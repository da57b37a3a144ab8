//! Data models
//!
//! Shared between the booking engine and any application layer.
//! All IDs are snowflake-style `i64` (see [`crate::util::snowflake_id`]);
//! all timestamps are Unix milliseconds (`i64`).

pub mod event;
pub mod reservation;
pub mod user;

// Re-exports
pub use event::*;
pub use reservation::*;
pub use user::*;
