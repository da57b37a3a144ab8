//! Capacity & availability engine
//!
//! The single source of truth for admission control. Availability is
//! always computed from the authoritative reservation set at the
//! instant of the check, never from a cached count; cancelled
//! reservations release their seats immediately and permanently.
//!
//! Callers that gate a commit on the result must hold the event's
//! booking lock across check and commit (see [`crate::locks`]).

use crate::repository::ReservationRepository;
use shared::error::AppResult;
use shared::models::Event;

/// Sum of seats held by the event's non-cancelled reservations.
pub async fn occupied_seats(
    reservations: &dyn ReservationRepository,
    event_id: i64,
) -> AppResult<i32> {
    let rows = reservations.find_by_event(event_id).await?;
    Ok(rows
        .iter()
        .filter(|r| r.occupies_seats())
        .map(|r| r.seat_count)
        .sum())
}

/// Remaining seats: `capacity - occupied`.
pub async fn available_seats(
    reservations: &dyn ReservationRepository,
    event: &Event,
) -> AppResult<i32> {
    let occupied = occupied_seats(reservations, event.id).await?;
    Ok(event.capacity - occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use rust_decimal::Decimal;
    use shared::models::{EventCategory, EventStatus, Reservation, ReservationStatus};

    fn event(capacity: i32) -> Event {
        Event {
            id: 1,
            title: "Test".to_string(),
            description: String::new(),
            category: EventCategory::Other,
            city: None,
            venue: None,
            capacity,
            price: Decimal::from(10),
            start_time: Some(1_000),
            end_time: Some(2_000),
            status: EventStatus::Published,
            organizer_id: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    async fn seed(store: &InMemoryStore, id: i64, seats: i32, status: ReservationStatus) {
        let r = Reservation {
            id,
            event_id: 1,
            client_id: 1,
            seat_count: seats,
            unit_price: Decimal::from(10),
            total_amount: Decimal::from(10 * seats as i64),
            code: format!("EVT-{:08}", id),
            status,
            comment: None,
            reserved_at: 0,
        };
        ReservationRepository::insert(store, r).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_event_reports_capacity() {
        let store = InMemoryStore::new();
        assert_eq!(available_seats(&store, &event(5)).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_non_cancelled_reservations_occupy() {
        let store = InMemoryStore::new();
        seed(&store, 1, 2, ReservationStatus::Pending).await;
        seed(&store, 2, 1, ReservationStatus::Confirmed).await;

        assert_eq!(occupied_seats(&store, 1).await.unwrap(), 3);
        assert_eq!(available_seats(&store, &event(5)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fully_cancelled_event_reports_capacity() {
        let store = InMemoryStore::new();
        seed(&store, 1, 3, ReservationStatus::Cancelled).await;
        seed(&store, 2, 2, ReservationStatus::Cancelled).await;

        assert_eq!(available_seats(&store, &event(5)).await.unwrap(), 5);
    }
}
