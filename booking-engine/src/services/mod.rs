//! Engine services
//!
//! - [`EventService`]: event lifecycle (create/edit/publish/cancel/
//!   delete) and the finished-event sweep
//! - [`ReservationService`]: reservation lifecycle with per-event
//!   admission control and unique-code issuance
//! - [`UserService`]: registration and the active flag
//! - [`StatsService`]: read-only rollups over committed state

pub mod event_service;
pub mod reservation_service;
pub mod stats_service;
pub mod user_service;

// Re-exports
pub use event_service::EventService;
pub use reservation_service::{
    ReservationService, CANCELLATION_WINDOW_MS, MAX_SEATS_PER_RESERVATION,
    MIN_SEATS_PER_RESERVATION,
};
pub use stats_service::{
    EventStatusCounts, OrganizerStats, PlatformStats, StatsService, UserStats,
};
pub use user_service::UserService;
