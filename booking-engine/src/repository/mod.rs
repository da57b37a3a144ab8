//! Storage contracts
//!
//! The engine never talks to a database directly; an application layer
//! provides implementations of these traits. [`InMemoryStore`] is the
//! reference backend used by the test suite and by embedders that do
//! not need durable storage.
//!
//! Implementations must provide the atomic-commit semantics the engine
//! relies on: [`ReservationRepository::insert`] enforces reservation
//! code uniqueness and fails with [`RepoError::Duplicate`] on
//! collision, so a racing insert is retried with a fresh candidate
//! rather than silently overwriting.

pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{Event, EventStatus, Reservation, User};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Storage(msg) => AppError::storage(msg),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Insert a new user; `Duplicate` if the id is already taken.
    async fn insert(&self, user: User) -> RepoResult<User>;

    /// Replace an existing user; `NotFound` if the id is unknown.
    async fn update(&self, user: User) -> RepoResult<User>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Event>>;

    async fn find_by_organizer(&self, organizer_id: i64) -> RepoResult<Vec<Event>>;

    async fn find_by_status(&self, status: EventStatus) -> RepoResult<Vec<Event>>;

    async fn find_all(&self) -> RepoResult<Vec<Event>>;

    /// Insert a new event; `Duplicate` if the id is already taken.
    async fn insert(&self, event: Event) -> RepoResult<Event>;

    /// Replace an existing event; `NotFound` if the id is unknown.
    async fn update(&self, event: Event) -> RepoResult<Event>;

    /// Remove an event record; `NotFound` if the id is unknown.
    async fn delete(&self, id: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Reservation>>;

    async fn find_by_event(&self, event_id: i64) -> RepoResult<Vec<Reservation>>;

    async fn find_by_client(&self, client_id: i64) -> RepoResult<Vec<Reservation>>;

    async fn find_all(&self) -> RepoResult<Vec<Reservation>>;

    /// Whether a reservation code has ever been issued. Advisory only;
    /// the authoritative check is the unique constraint in [`insert`].
    ///
    /// [`insert`]: ReservationRepository::insert
    async fn code_exists(&self, code: &str) -> RepoResult<bool>;

    /// Insert a new reservation, enforcing global code uniqueness.
    /// `Duplicate` if the code (or id) is already taken; the caller
    /// retries with a fresh candidate.
    async fn insert(&self, reservation: Reservation) -> RepoResult<Reservation>;

    /// Replace an existing reservation; `NotFound` if the id is unknown.
    async fn update(&self, reservation: Reservation) -> RepoResult<Reservation>;
}
