//! Booking and lifecycle engine for the tessera platform
//!
//! The engine owns the rules governing event state transitions,
//! seat-capacity accounting, reservation creation/cancellation,
//! unique-code issuance, and derived statistics. It is a library
//! consumed by an application layer: persistence is abstracted behind
//! repository traits, and the current time is injected through a
//! [`Clock`] so window and expiry logic stays testable.
//!
//! # Architecture
//!
//! ```text
//! caller ──> ReservationService ──┬─> permissions (authorize)
//!                                 ├─> availability (admission control)
//!                                 ├─> CodeIssuer (candidate codes)
//!                                 └─> ReservationRepository (commit)
//!            EventService ────────> EventRepository
//!            StatsService ────────> read-only rollups
//! ```
//!
//! Bookings against the same event are serialized through
//! [`EventLocks`], and the event service takes the same lock for
//! capacity and status changes; operations on different events never
//! contend. Both services must therefore share one registry.

pub mod availability;
pub mod clock;
pub mod code_issuer;
pub mod locks;
pub mod permissions;
pub mod repository;
pub mod services;
pub mod utils;

// Re-exports
pub use clock::{Clock, FixedClock, SystemClock};
pub use code_issuer::CodeIssuer;
pub use locks::EventLocks;
pub use repository::{
    EventRepository, InMemoryStore, RepoError, RepoResult, ReservationRepository, UserRepository,
};
pub use services::{
    EventService, OrganizerStats, PlatformStats, ReservationService, StatsService, UserService,
    UserStats,
};

// Re-export shared types for convenience
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use shared::models::{
    Event, EventCategory, EventCreate, EventStatus, EventUpdate, Reservation, ReservationStatus,
    User, UserCreate, UserRole,
};
