//! Event lifecycle service
//!
//! Owns event state transitions and field-completeness checks:
//!
//! ```text
//! DRAFT --publish--> PUBLISHED --cancel--> CANCELLED
//!   |                    |
//!   +----cancel----------+---(end date passed, sweep)--> FINISHED
//! any --delete--> removed, only with zero reservations
//! ```
//!
//! Status is interpreted here and nowhere else; other components only
//! see the outcome of a transition.

use crate::availability;
use crate::clock::Clock;
use crate::locks::EventLocks;
use crate::permissions::{self, EventAction};
use crate::repository::{EventRepository, ReservationRepository};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Event, EventCreate, EventStatus, EventUpdate, User, UserRole};
use shared::util::snowflake_id;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    reservations: Arc<dyn ReservationRepository>,
    clock: Arc<dyn Clock>,
    locks: Arc<EventLocks>,
}

impl EventService {
    /// `locks` must be the same registry the reservation service uses:
    /// capacity edits and status changes take the event's booking lock
    /// so they cannot interleave with an in-flight booking.
    pub fn new(
        events: Arc<dyn EventRepository>,
        reservations: Arc<dyn ReservationRepository>,
        clock: Arc<dyn Clock>,
        locks: Arc<EventLocks>,
    ) -> Self {
        Self {
            events,
            reservations,
            clock,
            locks,
        }
    }

    /// Load an event or fail with `EventNotFound`.
    pub async fn get_event(&self, event_id: i64) -> AppResult<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::EventNotFound).with_detail("event_id", event_id)
            })
    }

    pub async fn list_by_organizer(&self, organizer_id: i64) -> AppResult<Vec<Event>> {
        Ok(self.events.find_by_organizer(organizer_id).await?)
    }

    /// Create a new DRAFT event owned by the acting organizer.
    pub async fn create_event(&self, actor: &User, data: EventCreate) -> AppResult<Event> {
        if !matches!(actor.role, UserRole::Organizer | UserRole::Admin) {
            return Err(AppError::permission_denied(format!(
                "User {} may not create events",
                actor.id
            )));
        }
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Title must not be empty"));
        }

        let now = self.clock.now_millis();
        let event = Event {
            id: snowflake_id(),
            title: data.title,
            description: data.description.unwrap_or_default(),
            category: data.category,
            city: data.city,
            venue: data.venue,
            capacity: data.capacity,
            price: data.price,
            start_time: data.start_time,
            end_time: data.end_time,
            status: EventStatus::Draft,
            organizer_id: actor.id,
            created_at: now,
            updated_at: now,
        };
        validate_event_fields(&event)?;

        let created = self.events.insert(event).await?;
        info!(event_id = created.id, organizer_id = actor.id, "Event created");
        Ok(created)
    }

    /// Edit a DRAFT or PUBLISHED event. Terminal events reject edits
    /// with `EventClosed`; capacity can never drop below the seats
    /// already occupied.
    pub async fn edit_event(
        &self,
        actor: &User,
        event_id: i64,
        data: EventUpdate,
    ) -> AppResult<Event> {
        let event = self.get_event(event_id).await?;
        permissions::authorize_event(actor, &event, EventAction::Edit)?;

        // The occupied-seats read and the event write must not
        // interleave with a booking on this event.
        let lock = self.locks.for_event(event_id);
        let _guard = lock.lock().await;

        let mut event = self.get_event(event_id).await?;
        if event.status.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::EventClosed,
                format!("Event {} can no longer be edited", event_id),
            ));
        }

        if let Some(title) = data.title {
            event.title = title;
        }
        if let Some(description) = data.description {
            event.description = description;
        }
        if let Some(category) = data.category {
            event.category = category;
        }
        if let Some(city) = data.city {
            event.city = Some(city);
        }
        if let Some(venue) = data.venue {
            event.venue = Some(venue);
        }
        if let Some(price) = data.price {
            event.price = price;
        }
        if let Some(start_time) = data.start_time {
            event.start_time = Some(start_time);
        }
        if let Some(end_time) = data.end_time {
            event.end_time = Some(end_time);
        }
        if let Some(capacity) = data.capacity {
            let occupied =
                availability::occupied_seats(self.reservations.as_ref(), event_id).await?;
            if capacity < occupied {
                return Err(AppError::with_message(
                    ErrorCode::CapacityBelowOccupied,
                    format!(
                        "Capacity {} is below the {} seats already booked",
                        capacity, occupied
                    ),
                )
                .with_detail("occupied", occupied));
            }
            event.capacity = capacity;
        }
        validate_event_fields(&event)?;

        event.updated_at = self.clock.now_millis();
        let updated = self.events.update(event).await?;
        debug!(event_id, "Event edited");
        Ok(updated)
    }

    /// Publish a DRAFT event. All display and scheduling fields must be
    /// set; violations fail with `IncompleteEvent` naming the missing
    /// fields.
    pub async fn publish_event(&self, actor: &User, event_id: i64) -> AppResult<Event> {
        let mut event = self.get_event(event_id).await?;
        permissions::authorize_event(actor, &event, EventAction::Publish)?;

        match event.status {
            EventStatus::Draft => {}
            s if s.is_terminal() => {
                return Err(AppError::with_message(
                    ErrorCode::EventClosed,
                    format!("Event {} can no longer be published", event_id),
                ));
            }
            _ => {
                return Err(AppError::invalid_transition(format!(
                    "Event {} is already published",
                    event_id
                )));
            }
        }

        let missing = missing_publish_fields(&event);
        if !missing.is_empty() {
            return Err(AppError::incomplete_event(&missing));
        }

        event.status = EventStatus::Published;
        event.updated_at = self.clock.now_millis();
        let published = self.events.update(event).await?;
        info!(event_id, "Event published");
        Ok(published)
    }

    /// Cancel a DRAFT or PUBLISHED event.
    pub async fn cancel_event(&self, actor: &User, event_id: i64) -> AppResult<Event> {
        let event = self.get_event(event_id).await?;
        permissions::authorize_event(actor, &event, EventAction::Cancel)?;

        // Taken so an in-flight booking either commits before the
        // cancellation or sees the cancelled status, never neither.
        let lock = self.locks.for_event(event_id);
        let _guard = lock.lock().await;

        let mut event = self.get_event(event_id).await?;
        if event.status.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::EventClosed,
                format!("Event {} can no longer be cancelled", event_id),
            ));
        }

        event.status = EventStatus::Cancelled;
        event.updated_at = self.clock.now_millis();
        let cancelled = self.events.update(event).await?;
        info!(event_id, "Event cancelled");
        Ok(cancelled)
    }

    /// Remove an event record. Allowed only while the event has zero
    /// reservations; cancelled reservations still count, they are never
    /// destroyed.
    pub async fn delete_event(&self, actor: &User, event_id: i64) -> AppResult<()> {
        let event = self.get_event(event_id).await?;
        permissions::authorize_event(actor, &event, EventAction::Delete)?;

        // A booking racing the emptiness check must not slip in
        let lock = self.locks.for_event(event_id);
        let _guard = lock.lock().await;

        let reservation_count = self.reservations.find_by_event(event_id).await?.len();
        if reservation_count > 0 {
            return Err(AppError::with_message(
                ErrorCode::EventHasReservations,
                format!(
                    "Event {} has {} reservations and cannot be deleted",
                    event_id, reservation_count
                ),
            )
            .with_detail("reservation_count", reservation_count));
        }

        self.events.delete(event_id).await?;
        info!(event_id, "Event deleted");
        Ok(())
    }

    /// Background sweep: transition every PUBLISHED event whose end
    /// date has passed to FINISHED. Idempotent; safe to run on any
    /// cadence. Returns the number of events transitioned.
    pub async fn advance_finished_events(&self) -> AppResult<u32> {
        let now = self.clock.now_millis();
        let published = self.events.find_by_status(EventStatus::Published).await?;

        let mut transitioned = 0u32;
        for mut event in published {
            if event.end_time.is_some_and(|end| end <= now) {
                event.status = EventStatus::Finished;
                event.updated_at = now;
                let event_id = event.id;
                self.events.update(event).await?;
                debug!(event_id, "Event finished");
                transitioned += 1;
            }
        }

        if transitioned > 0 {
            info!(transitioned, "Finished-event sweep completed");
        }
        Ok(transitioned)
    }
}

/// Shared field invariants for create and edit.
fn validate_event_fields(event: &Event) -> AppResult<()> {
    if event.capacity <= 0 {
        return Err(AppError::validation("Capacity must be positive"));
    }
    if event.price < Decimal::ZERO {
        return Err(AppError::validation("Price must not be negative"));
    }
    if let (Some(start), Some(end)) = (event.start_time, event.end_time) {
        if end <= start {
            return Err(AppError::validation("End date must be after start date"));
        }
    }
    Ok(())
}

/// Fields required before an event may go on sale.
fn missing_publish_fields(event: &Event) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if event.title.trim().is_empty() {
        missing.push("title");
    }
    if event.start_time.is_none() {
        missing.push("start_time");
    }
    if event.end_time.is_none() {
        missing.push("end_time");
    }
    if !event.city.as_deref().is_some_and(|c| !c.trim().is_empty()) {
        missing.push("city");
    }
    if !event.venue.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        missing.push("venue");
    }
    if event.price < Decimal::ZERO {
        missing.push("price");
    }
    if event.capacity <= 0 {
        missing.push("capacity");
    }
    missing
}
