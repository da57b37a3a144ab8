//! Reservation lifecycle service
//!
//! Booking is the only path that consumes capacity. Event snapshot,
//! availability check and reservation commit happen as one critical
//! section under the event's booking lock (shared with the event
//! service, which takes it for capacity and status changes), so the
//! sum of non-cancelled seats can never exceed capacity.
//!
//! Reservation codes are drawn from [`CodeIssuer`] and committed
//! against the repository's unique constraint; a collision retries with
//! a fresh candidate instead of failing the booking.

use crate::availability;
use crate::clock::Clock;
use crate::code_issuer::CodeIssuer;
use crate::locks::EventLocks;
use crate::permissions::{self, ReservationAction};
use crate::repository::{
    EventRepository, RepoError, ReservationRepository, UserRepository,
};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Event, EventStatus, Reservation, ReservationStatus, User};
use shared::util::snowflake_id;
use std::sync::Arc;
use tracing::{info, warn};

/// Seats per reservation, inclusive bounds
pub const MIN_SEATS_PER_RESERVATION: i32 = 1;
pub const MAX_SEATS_PER_RESERVATION: i32 = 10;

/// Client cancellation closes this long before the event starts (48h)
pub const CANCELLATION_WINDOW_MS: i64 = 48 * 60 * 60 * 1000;

/// Commit attempts before the code space is declared exhausted
const MAX_CODE_ATTEMPTS: u32 = 128;

#[derive(Clone)]
pub struct ReservationService {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    reservations: Arc<dyn ReservationRepository>,
    clock: Arc<dyn Clock>,
    locks: Arc<EventLocks>,
    issuer: CodeIssuer,
}

impl ReservationService {
    /// `locks` must be the registry shared with the event service;
    /// bookings and capacity/status edits serialize on the same
    /// per-event mutex.
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        reservations: Arc<dyn ReservationRepository>,
        clock: Arc<dyn Clock>,
        locks: Arc<EventLocks>,
    ) -> Self {
        Self {
            users,
            events,
            reservations,
            clock,
            locks,
            issuer: CodeIssuer::new(),
        }
    }

    /// Replace the default code issuer, mainly for tests that need a
    /// small code space.
    pub fn with_code_issuer(mut self, issuer: CodeIssuer) -> Self {
        self.issuer = issuer;
        self
    }

    /// Book seats on a published event. Runs under the event's booking
    /// lock so concurrent bookings against the same event are admitted
    /// one at a time.
    pub async fn create_reservation(
        &self,
        actor: &User,
        event_id: i64,
        seat_count: i32,
        comment: Option<String>,
    ) -> AppResult<Reservation> {
        if !(MIN_SEATS_PER_RESERVATION..=MAX_SEATS_PER_RESERVATION).contains(&seat_count) {
            return Err(AppError::with_message(
                ErrorCode::InvalidSeatCount,
                format!(
                    "Seat count must be between {} and {}",
                    MIN_SEATS_PER_RESERVATION, MAX_SEATS_PER_RESERVATION
                ),
            )
            .with_detail("seat_count", seat_count));
        }

        // Re-read the client record; the caller's copy may be stale.
        let client = self
            .users
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
        if !client.is_active {
            return Err(AppError::with_message(
                ErrorCode::AccountDisabled,
                format!("User {} is disabled and cannot book", client.id),
            ));
        }

        // Critical section: the event snapshot, the availability check
        // and the commit all happen under the event's booking lock, so
        // a concurrent cancellation or capacity edit is either fully
        // before or fully after this booking.
        let lock = self.locks.for_event(event_id);
        let _guard = lock.lock().await;

        let event = self.get_event(event_id).await?;
        if event.status != EventStatus::Published {
            return Err(AppError::with_message(
                ErrorCode::EventNotBookable,
                format!("Event {} is not open for booking", event_id),
            ));
        }
        // Published events always carry an end date
        let Some(end_time) = event.end_time else {
            return Err(AppError::with_message(
                ErrorCode::EventNotBookable,
                format!("Event {} has no end date", event_id),
            ));
        };
        let now = self.clock.now_millis();
        if end_time <= now {
            return Err(AppError::with_message(
                ErrorCode::EventAlreadyEnded,
                format!("Event {} has already ended", event_id),
            ));
        }

        let remaining =
            availability::available_seats(self.reservations.as_ref(), &event).await?;
        if remaining < seat_count {
            return Err(AppError::insufficient_seats(remaining));
        }

        let unit_price = event.price;
        let total_amount = Decimal::from(seat_count) * unit_price;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.issuer.candidate();
            if self.reservations.code_exists(&code).await? {
                continue;
            }
            let reservation = Reservation {
                id: snowflake_id(),
                event_id,
                client_id: client.id,
                seat_count,
                unit_price,
                total_amount,
                code,
                status: ReservationStatus::Pending,
                comment: comment.clone(),
                reserved_at: now,
            };
            match self.reservations.insert(reservation).await {
                Ok(created) => {
                    info!(
                        reservation_id = created.id,
                        event_id,
                        client_id = client.id,
                        seat_count,
                        code = %created.code,
                        "Reservation created"
                    );
                    return Ok(created);
                }
                // Lost the race for this code (or id); draw again
                Err(RepoError::Duplicate(msg)) => {
                    warn!(event_id, "Reservation commit collided, retrying: {}", msg);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::with_message(
            ErrorCode::CodeSpaceExhausted,
            format!(
                "Could not allocate a unique reservation code after {} attempts",
                MAX_CODE_ATTEMPTS
            ),
        ))
    }

    /// Confirm a pending reservation. Organizer (or admin) only.
    pub async fn confirm_reservation(
        &self,
        actor: &User,
        reservation_id: i64,
    ) -> AppResult<Reservation> {
        let mut reservation = self.get_reservation(reservation_id).await?;
        let event = self.get_event(reservation.event_id).await?;
        permissions::authorize_reservation(
            actor,
            &reservation,
            &event,
            ReservationAction::Confirm,
        )?;

        if reservation.status != ReservationStatus::Pending {
            return Err(AppError::invalid_transition(format!(
                "Reservation {} is {:?} and cannot be confirmed",
                reservation_id, reservation.status
            )));
        }

        reservation.status = ReservationStatus::Confirmed;
        let confirmed = self.reservations.update(reservation).await?;
        info!(reservation_id, "Reservation confirmed");
        Ok(confirmed)
    }

    /// Cancel a reservation and release its seats. Clients may cancel
    /// their own bookings up to the cancellation window before the
    /// event starts; admins may cancel at any time.
    pub async fn cancel_reservation(
        &self,
        actor: &User,
        reservation_id: i64,
    ) -> AppResult<Reservation> {
        let mut reservation = self.get_reservation(reservation_id).await?;
        let event = self.get_event(reservation.event_id).await?;
        permissions::authorize_reservation(
            actor,
            &reservation,
            &event,
            ReservationAction::Cancel,
        )?;

        if reservation.status == ReservationStatus::Cancelled {
            return Err(AppError::invalid_transition(format!(
                "Reservation {} is already cancelled",
                reservation_id
            )));
        }

        if !actor.is_admin() {
            let start_time = event.start_time.ok_or_else(|| {
                AppError::internal(format!("Event {} has no start date", event.id))
            })?;
            let now = self.clock.now_millis();
            if start_time - now < CANCELLATION_WINDOW_MS {
                return Err(AppError::with_message(
                    ErrorCode::CancellationWindowClosed,
                    format!(
                        "Reservation {} can no longer be cancelled, the event starts too soon",
                        reservation_id
                    ),
                ));
            }
        }

        reservation.status = ReservationStatus::Cancelled;
        let cancelled = self.reservations.update(reservation).await?;
        info!(reservation_id, event_id = event.id, "Reservation cancelled");
        Ok(cancelled)
    }

    pub async fn get_reservation(&self, reservation_id: i64) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ReservationNotFound)
                    .with_detail("reservation_id", reservation_id)
            })
    }

    pub async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Reservation>> {
        Ok(self.reservations.find_by_client(client_id).await?)
    }

    pub async fn list_by_event(&self, event_id: i64) -> AppResult<Vec<Reservation>> {
        Ok(self.reservations.find_by_event(event_id).await?)
    }

    /// Remaining seats on an event, computed from live reservation
    /// state. Unlocked; a display value only, not an admission promise.
    pub async fn available_seats(&self, event_id: i64) -> AppResult<i32> {
        let event = self.get_event(event_id).await?;
        availability::available_seats(self.reservations.as_ref(), &event).await
    }

    async fn get_event(&self, event_id: i64) -> AppResult<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::EventNotFound).with_detail("event_id", event_id)
            })
    }
}
