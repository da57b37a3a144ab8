//! Concurrency behavior: the capacity invariant must hold under
//! parallel bookings, and reservation codes must stay unique even when
//! the code space is tight.

use async_trait::async_trait;
use booking_engine::{
    CodeIssuer, ErrorCode, Event, EventCategory, EventCreate, EventLocks, EventRepository,
    EventService, EventStatus, EventUpdate, FixedClock, InMemoryStore, RepoResult, Reservation,
    ReservationRepository, ReservationService, User, UserRepository, UserRole,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

const NOW: i64 = 1_700_000_000_000;
const HOUR: i64 = 60 * 60 * 1000;
const DAY: i64 = 24 * HOUR;
const ORGANIZER: i64 = 2;

struct TestEnv {
    store: Arc<InMemoryStore>,
    events: EventService,
    reservations: ReservationService,
}

fn client(id: i64) -> User {
    User {
        id,
        name: format!("client-{}", id),
        email: format!("client-{}@example.com", id),
        role: UserRole::Client,
        is_active: true,
        created_at: 0,
    }
}

async fn env() -> TestEnv {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::new(NOW));

    UserRepository::insert(
        store.as_ref(),
        User {
            id: ORGANIZER,
            name: "organizer".to_string(),
            email: "organizer@example.com".to_string(),
            role: UserRole::Organizer,
            is_active: true,
            created_at: 0,
        },
    )
    .await
    .unwrap();

    let locks = Arc::new(EventLocks::new());
    TestEnv {
        store: store.clone(),
        events: EventService::new(store.clone(), store.clone(), clock.clone(), locks.clone()),
        reservations: ReservationService::new(store.clone(), store.clone(), store, clock, locks),
    }
}

/// Seed `count` active clients starting at id 1000.
async fn seed_clients(env: &TestEnv, count: i64) -> Vec<User> {
    let mut clients = Vec::new();
    for i in 0..count {
        let c = client(1000 + i);
        UserRepository::insert(env.store.as_ref(), c.clone())
            .await
            .unwrap();
        clients.push(c);
    }
    clients
}

async fn published_event(env: &TestEnv, capacity: i32) -> Event {
    let organizer = User {
        id: ORGANIZER,
        name: "organizer".to_string(),
        email: "organizer@example.com".to_string(),
        role: UserRole::Organizer,
        is_active: true,
        created_at: 0,
    };
    let start = NOW + 30 * DAY;
    let created = env
        .events
        .create_event(
            &organizer,
            EventCreate {
                title: "Stress Night".to_string(),
                description: None,
                category: EventCategory::Concert,
                city: Some("Porto".to_string()),
                venue: Some("Coliseu".to_string()),
                capacity,
                price: Decimal::from(25),
                start_time: Some(start),
                end_time: Some(start + 3 * HOUR),
            },
        )
        .await
        .unwrap();
    env.events.publish_event(&organizer, created.id).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_parallel_bookings_never_oversell() {
    let env = env().await;
    let event = published_event(&env, 50).await;
    let clients = seed_clients(&env, 100).await;

    let mut handles = Vec::new();
    for c in clients {
        let svc = env.reservations.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            svc.create_reservation(&c, event_id, 1, None).await
        }));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => {
                assert_eq!(e.code, ErrorCode::InsufficientSeats);
                rejected += 1;
            }
        }
    }

    assert_eq!(succeeded, 50);
    assert_eq!(rejected, 50);
    assert_eq!(env.reservations.available_seats(event.id).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_multi_seat_parallel_occupancy_bounded() {
    let env = env().await;
    let event = published_event(&env, 20).await;
    let clients = seed_clients(&env, 30).await;

    let bookings = clients.iter().enumerate().map(|(i, c)| {
        let seats = (i % 3) as i32 + 1;
        env.reservations.create_reservation(c, event.id, seats, None)
    });
    for result in futures::future::join_all(bookings).await {
        if let Err(e) = result {
            assert_eq!(e.code, ErrorCode::InsufficientSeats);
        }
    }

    let remaining = env.reservations.available_seats(event.id).await.unwrap();
    assert!(remaining >= 0, "oversold: {} seats remaining", remaining);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_independent_events_fill_in_parallel() {
    let env = env().await;
    let first = published_event(&env, 10).await;
    let second = published_event(&env, 10).await;
    let clients = seed_clients(&env, 20).await;

    let mut handles = Vec::new();
    for (i, c) in clients.into_iter().enumerate() {
        let svc = env.reservations.clone();
        let event_id = if i % 2 == 0 { first.id } else { second.id };
        handles.push(tokio::spawn(async move {
            svc.create_reservation(&c, event_id, 1, None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(env.reservations.available_seats(first.id).await.unwrap(), 0);
    assert_eq!(env.reservations.available_seats(second.id).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_codes_unique_under_contention() {
    let env = env().await;
    let event = published_event(&env, 300).await;
    let clients = seed_clients(&env, 300).await;

    // A 1000-code space forces frequent candidate collisions
    let svc = env
        .reservations
        .clone()
        .with_code_issuer(CodeIssuer::with_format("BK-", 3));

    let mut handles = Vec::new();
    for c in clients {
        let svc = svc.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            svc.create_reservation(&c, event_id, 1, None).await
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let reservation = handle.await.unwrap().unwrap();
        assert!(
            codes.insert(reservation.code.clone()),
            "code {} issued twice",
            reservation.code
        );
    }
    assert_eq!(codes.len(), 300);
}

/// Delegates to the in-memory store but yields to the scheduler before
/// every call, the way a real async database driver suspends at each
/// await point. Makes lost-update interleavings easy to hit.
struct YieldingStore(Arc<InMemoryStore>);

#[async_trait]
impl UserRepository for YieldingStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        tokio::task::yield_now().await;
        UserRepository::find_by_id(self.0.as_ref(), id).await
    }

    async fn insert(&self, user: User) -> RepoResult<User> {
        tokio::task::yield_now().await;
        UserRepository::insert(self.0.as_ref(), user).await
    }

    async fn update(&self, user: User) -> RepoResult<User> {
        tokio::task::yield_now().await;
        UserRepository::update(self.0.as_ref(), user).await
    }
}

#[async_trait]
impl EventRepository for YieldingStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Event>> {
        tokio::task::yield_now().await;
        EventRepository::find_by_id(self.0.as_ref(), id).await
    }

    async fn find_by_organizer(&self, organizer_id: i64) -> RepoResult<Vec<Event>> {
        tokio::task::yield_now().await;
        self.0.find_by_organizer(organizer_id).await
    }

    async fn find_by_status(&self, status: EventStatus) -> RepoResult<Vec<Event>> {
        tokio::task::yield_now().await;
        self.0.find_by_status(status).await
    }

    async fn find_all(&self) -> RepoResult<Vec<Event>> {
        tokio::task::yield_now().await;
        EventRepository::find_all(self.0.as_ref()).await
    }

    async fn insert(&self, event: Event) -> RepoResult<Event> {
        tokio::task::yield_now().await;
        EventRepository::insert(self.0.as_ref(), event).await
    }

    async fn update(&self, event: Event) -> RepoResult<Event> {
        tokio::task::yield_now().await;
        EventRepository::update(self.0.as_ref(), event).await
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        tokio::task::yield_now().await;
        self.0.delete(id).await
    }
}

#[async_trait]
impl ReservationRepository for YieldingStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Reservation>> {
        tokio::task::yield_now().await;
        ReservationRepository::find_by_id(self.0.as_ref(), id).await
    }

    async fn find_by_event(&self, event_id: i64) -> RepoResult<Vec<Reservation>> {
        tokio::task::yield_now().await;
        self.0.find_by_event(event_id).await
    }

    async fn find_by_client(&self, client_id: i64) -> RepoResult<Vec<Reservation>> {
        tokio::task::yield_now().await;
        self.0.find_by_client(client_id).await
    }

    async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        tokio::task::yield_now().await;
        ReservationRepository::find_all(self.0.as_ref()).await
    }

    async fn code_exists(&self, code: &str) -> RepoResult<bool> {
        tokio::task::yield_now().await;
        self.0.code_exists(code).await
    }

    async fn insert(&self, reservation: Reservation) -> RepoResult<Reservation> {
        tokio::task::yield_now().await;
        ReservationRepository::insert(self.0.as_ref(), reservation).await
    }

    async fn update(&self, reservation: Reservation) -> RepoResult<Reservation> {
        tokio::task::yield_now().await;
        ReservationRepository::update(self.0.as_ref(), reservation).await
    }
}

/// A capacity-lowering edit racing a booking must serialize on the
/// event's lock: either the booking commits first and the edit fails
/// `CapacityBelowOccupied`, or the edit commits first and the booking
/// fails `InsufficientSeats`. Both succeeding would break the capacity
/// invariant.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_edit_serialized_against_booking() {
    let organizer = User {
        id: ORGANIZER,
        name: "organizer".to_string(),
        email: "organizer@example.com".to_string(),
        role: UserRole::Organizer,
        is_active: true,
        created_at: 0,
    };

    for round in 0..25 {
        let inner = Arc::new(InMemoryStore::new());
        UserRepository::insert(inner.as_ref(), organizer.clone())
            .await
            .unwrap();
        UserRepository::insert(inner.as_ref(), client(1000)).await.unwrap();

        let store = Arc::new(YieldingStore(inner));
        let clock = Arc::new(FixedClock::new(NOW));
        let locks = Arc::new(EventLocks::new());
        let events = EventService::new(store.clone(), store.clone(), clock.clone(), locks.clone());
        let reservations =
            ReservationService::new(store.clone(), store.clone(), store.clone(), clock, locks);

        let start = NOW + 30 * DAY;
        let event = events
            .create_event(
                &organizer,
                EventCreate {
                    title: "Race Night".to_string(),
                    description: None,
                    category: EventCategory::Concert,
                    city: Some("Porto".to_string()),
                    venue: Some("Coliseu".to_string()),
                    capacity: 10,
                    price: Decimal::from(25),
                    start_time: Some(start),
                    end_time: Some(start + 3 * HOUR),
                },
            )
            .await
            .unwrap();
        let event = events.publish_event(&organizer, event.id).await.unwrap();

        let book = tokio::spawn({
            let svc = reservations.clone();
            let c = client(1000);
            let event_id = event.id;
            async move { svc.create_reservation(&c, event_id, 10, None).await }
        });
        let shrink = tokio::spawn({
            let svc = events.clone();
            let o = organizer.clone();
            let event_id = event.id;
            async move {
                svc.edit_event(
                    &o,
                    event_id,
                    EventUpdate {
                        capacity: Some(1),
                        ..Default::default()
                    },
                )
                .await
            }
        });

        let booked = book.await.unwrap();
        let shrunk = shrink.await.unwrap();

        assert!(
            !(booked.is_ok() && shrunk.is_ok()),
            "round {}: booking and capacity cut both succeeded",
            round
        );

        let current = events.get_event(event.id).await.unwrap();
        let occupied: i32 = reservations
            .list_by_event(event.id)
            .await
            .unwrap()
            .iter()
            .filter(|r| r.occupies_seats())
            .map(|r| r.seat_count)
            .sum();
        assert!(
            occupied <= current.capacity,
            "round {}: occupied {} > capacity {}",
            round,
            occupied,
            current.capacity
        );
    }
}

/// An event cancelled while a booking is in flight: the booking either
/// commits before the cancellation or observes the cancelled status.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_event_cancel_serialized_against_booking() {
    let organizer = User {
        id: ORGANIZER,
        name: "organizer".to_string(),
        email: "organizer@example.com".to_string(),
        role: UserRole::Organizer,
        is_active: true,
        created_at: 0,
    };

    for _ in 0..25 {
        let inner = Arc::new(InMemoryStore::new());
        UserRepository::insert(inner.as_ref(), organizer.clone())
            .await
            .unwrap();
        UserRepository::insert(inner.as_ref(), client(1000)).await.unwrap();

        let store = Arc::new(YieldingStore(inner));
        let clock = Arc::new(FixedClock::new(NOW));
        let locks = Arc::new(EventLocks::new());
        let events = EventService::new(store.clone(), store.clone(), clock.clone(), locks.clone());
        let reservations =
            ReservationService::new(store.clone(), store.clone(), store.clone(), clock, locks);

        let start = NOW + 30 * DAY;
        let event = events
            .create_event(
                &organizer,
                EventCreate {
                    title: "Short Lived".to_string(),
                    description: None,
                    category: EventCategory::Other,
                    city: Some("Porto".to_string()),
                    venue: Some("Coliseu".to_string()),
                    capacity: 10,
                    price: Decimal::from(25),
                    start_time: Some(start),
                    end_time: Some(start + HOUR),
                },
            )
            .await
            .unwrap();
        let event = events.publish_event(&organizer, event.id).await.unwrap();

        let book = tokio::spawn({
            let svc = reservations.clone();
            let c = client(1000);
            let event_id = event.id;
            async move { svc.create_reservation(&c, event_id, 1, None).await }
        });
        let cancel = tokio::spawn({
            let svc = events.clone();
            let o = organizer.clone();
            let event_id = event.id;
            async move { svc.cancel_event(&o, event_id).await }
        });

        let booked = book.await.unwrap();
        cancel.await.unwrap().unwrap();

        // A rejected booking must have been rejected for the right
        // reason: it saw the cancelled event, not a phantom state.
        if let Err(e) = booked {
            assert_eq!(e.code, ErrorCode::EventNotBookable);
        }
    }
}

#[tokio::test]
async fn test_code_space_exhaustion() {
    let env = env().await;
    let event = published_event(&env, 100).await;
    let clients = seed_clients(&env, 11).await;

    // Ten possible codes in total
    let svc = env
        .reservations
        .clone()
        .with_code_issuer(CodeIssuer::with_format("BK-", 1));

    for c in &clients[..10] {
        svc.create_reservation(c, event.id, 1, None).await.unwrap();
    }

    let err = svc
        .create_reservation(&clients[10], event.id, 1, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CodeSpaceExhausted);
    assert!(err.is_infrastructure());
}
