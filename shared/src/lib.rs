//! Shared types for the tessera booking platform
//!
//! Domain models, the unified error system, and small utilities used
//! by the booking engine and by any application layer embedding it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
