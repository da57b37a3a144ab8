//! In-memory storage backend
//!
//! Reference implementation of the repository traits, used by the test
//! suite and by embedders that do not need durable storage. Issued
//! reservation codes are kept in a dedicated set so uniqueness survives
//! cancellation (codes are never recycled).

use super::{
    EventRepository, RepoError, RepoResult, ReservationRepository, UserRepository,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Event, EventStatus, Reservation, User};
use std::collections::{HashMap, HashSet};

/// In-memory store implementing all repository traits
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<i64, User>>,
    events: RwLock<HashMap<i64, Event>>,
    reservations: RwLock<HashMap<i64, Reservation>>,
    /// Every code ever issued, including codes of cancelled reservations
    codes: RwLock<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("users", &self.users.read().len())
            .field("events", &self.events.read().len())
            .field("reservations", &self.reservations.read().len())
            .finish()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn insert(&self, user: User) -> RepoResult<User> {
        let mut users = self.users.write();
        if users.contains_key(&user.id) {
            return Err(RepoError::Duplicate(format!("User {} already exists", user.id)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> RepoResult<User> {
        let mut users = self.users.write();
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound(format!("User {} not found", user.id)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Event>> {
        Ok(self.events.read().get(&id).cloned())
    }

    async fn find_by_organizer(&self, organizer_id: i64) -> RepoResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: EventStatus) -> RepoResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .values()
            .filter(|e| e.status == status)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> RepoResult<Vec<Event>> {
        Ok(self.events.read().values().cloned().collect())
    }

    async fn insert(&self, event: Event) -> RepoResult<Event> {
        let mut events = self.events.write();
        if events.contains_key(&event.id) {
            return Err(RepoError::Duplicate(format!("Event {} already exists", event.id)));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, event: Event) -> RepoResult<Event> {
        let mut events = self.events.write();
        if !events.contains_key(&event.id) {
            return Err(RepoError::NotFound(format!("Event {} not found", event.id)));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut events = self.events.write();
        if events.remove(&id).is_none() {
            return Err(RepoError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Reservation>> {
        Ok(self.reservations.read().get(&id).cloned())
    }

    async fn find_by_event(&self, event_id: i64) -> RepoResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .read()
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn find_by_client(&self, client_id: i64) -> RepoResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .read()
            .values()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        Ok(self.reservations.read().values().cloned().collect())
    }

    async fn code_exists(&self, code: &str) -> RepoResult<bool> {
        Ok(self.codes.read().contains(code))
    }

    async fn insert(&self, reservation: Reservation) -> RepoResult<Reservation> {
        // Lock order: codes before reservations. The code set and the
        // row must move together or a racing insert could reuse a code.
        let mut codes = self.codes.write();
        let mut reservations = self.reservations.write();
        if codes.contains(&reservation.code) {
            return Err(RepoError::Duplicate(format!(
                "Reservation code {} already exists",
                reservation.code
            )));
        }
        if reservations.contains_key(&reservation.id) {
            return Err(RepoError::Duplicate(format!(
                "Reservation {} already exists",
                reservation.id
            )));
        }
        codes.insert(reservation.code.clone());
        reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let mut reservations = self.reservations.write();
        if !reservations.contains_key(&reservation.id) {
            return Err(RepoError::NotFound(format!(
                "Reservation {} not found",
                reservation.id
            )));
        }
        reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ReservationStatus;

    fn reservation(id: i64, code: &str) -> Reservation {
        Reservation {
            id,
            event_id: 1,
            client_id: 1,
            seat_count: 2,
            unit_price: Decimal::from(10),
            total_amount: Decimal::from(20),
            code: code.to_string(),
            status: ReservationStatus::Pending,
            comment: None,
            reserved_at: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = InMemoryStore::new();
        ReservationRepository::insert(&store, reservation(1, "EVT-0001"))
            .await
            .unwrap();

        let err = ReservationRepository::insert(&store, reservation(2, "EVT-0001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_code_survives_cancellation() {
        let store = InMemoryStore::new();
        let mut r = ReservationRepository::insert(&store, reservation(1, "EVT-0001"))
            .await
            .unwrap();

        r.status = ReservationStatus::Cancelled;
        ReservationRepository::update(&store, r).await.unwrap();

        // Cancelled codes are not recycled
        assert!(store.code_exists("EVT-0001").await.unwrap());
        let err = ReservationRepository::insert(&store, reservation(2, "EVT-0001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_missing_reservation_fails() {
        let store = InMemoryStore::new();
        let err = ReservationRepository::update(&store, reservation(9, "EVT-0009"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
