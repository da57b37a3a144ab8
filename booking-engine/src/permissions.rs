//! Identity & permission gate
//!
//! Stateless checks consulted by every mutating operation. Denial is
//! always the single `PermissionDenied` kind; the reason string is for
//! display only and never drives control flow.

use shared::error::{AppError, AppResult};
use shared::models::{Event, Reservation, User};
use std::fmt;

/// Mutating actions on an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Edit,
    Publish,
    Cancel,
    Delete,
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventAction::Edit => write!(f, "edit"),
            EventAction::Publish => write!(f, "publish"),
            EventAction::Cancel => write!(f, "cancel"),
            EventAction::Delete => write!(f, "delete"),
        }
    }
}

/// Mutating actions on a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    Confirm,
    Cancel,
}

impl fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationAction::Confirm => write!(f, "confirm"),
            ReservationAction::Cancel => write!(f, "cancel"),
        }
    }
}

/// Event actions are allowed for admins and for the owning organizer.
pub fn authorize_event(actor: &User, event: &Event, action: EventAction) -> AppResult<()> {
    if actor.is_admin() || actor.id == event.organizer_id {
        return Ok(());
    }
    Err(AppError::permission_denied(format!(
        "User {} may not {} event {}",
        actor.id, action, event.id
    )))
}

/// Reservation confirmation is allowed for the event's organizer (and
/// admins); cancellation for the owning client (and admins).
pub fn authorize_reservation(
    actor: &User,
    reservation: &Reservation,
    event: &Event,
    action: ReservationAction,
) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    let allowed = match action {
        ReservationAction::Confirm => actor.id == event.organizer_id,
        ReservationAction::Cancel => actor.id == reservation.client_id,
    };
    if allowed {
        return Ok(());
    }
    Err(AppError::permission_denied(format!(
        "User {} may not {} reservation {}",
        actor.id, action, reservation.id
    )))
}
