//! Statistics & reporting
//!
//! Read-only rollups computed from committed state at call time. No
//! counters are maintained incrementally, so the numbers are always
//! consistent with the reservation and event sets they are derived
//! from. Monetary sums stay in [`Decimal`].

use crate::repository::{EventRepository, ReservationRepository};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::AppResult;
use shared::models::{EventStatus, Reservation, ReservationStatus};
use std::collections::HashSet;
use std::sync::Arc;

/// Event totals broken down by lifecycle state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStatusCounts {
    pub draft: u32,
    pub published: u32,
    pub cancelled: u32,
    pub finished: u32,
}

impl EventStatusCounts {
    fn record(&mut self, status: EventStatus) {
        match status {
            EventStatus::Draft => self.draft += 1,
            EventStatus::Published => self.published += 1,
            EventStatus::Cancelled => self.cancelled += 1,
            EventStatus::Finished => self.finished += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.draft + self.published + self.cancelled + self.finished
    }
}

/// Activity rollup for a single user acting as a client
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub user_id: i64,
    pub events_organized: u32,
    pub reservations_made: u32,
    /// Sum of `total_amount` over the user's non-cancelled reservations
    pub total_spent: Decimal,
}

/// Sales rollup for a single organizer
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerStats {
    pub organizer_id: i64,
    pub events: EventStatusCounts,
    pub reservations_received: u32,
    /// Revenue from CONFIRMED reservations only
    pub total_revenue: Decimal,
    /// Confirmed revenue from reservations made at or after the period start
    pub period_revenue: Decimal,
}

/// Platform-wide rollup
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub events: EventStatusCounts,
    pub reservations: u32,
    pub active_clients: u32,
    pub total_revenue: Decimal,
    pub period_revenue: Decimal,
}

#[derive(Clone)]
pub struct StatsService {
    events: Arc<dyn EventRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl StatsService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            events,
            reservations,
        }
    }

    /// Rollup for one user: events they organize plus their own
    /// bookings. Spend counts PENDING and CONFIRMED reservations, since
    /// a pending booking still holds its seats and its price.
    pub async fn user_stats(&self, user_id: i64) -> AppResult<UserStats> {
        let organized = self.events.find_by_organizer(user_id).await?;
        let bookings = self.reservations.find_by_client(user_id).await?;

        let total_spent = bookings
            .iter()
            .filter(|r| r.status != ReservationStatus::Cancelled)
            .map(|r| r.total_amount)
            .sum();

        Ok(UserStats {
            user_id,
            events_organized: organized.len() as u32,
            reservations_made: bookings.len() as u32,
            total_spent,
        })
    }

    /// Sales rollup for one organizer across all their events.
    /// `period_start` bounds `period_revenue`; revenue means confirmed
    /// reservations only.
    pub async fn organizer_stats(
        &self,
        organizer_id: i64,
        period_start: i64,
    ) -> AppResult<OrganizerStats> {
        let organized = self.events.find_by_organizer(organizer_id).await?;

        let mut events = EventStatusCounts::default();
        let mut event_ids = HashSet::new();
        for event in &organized {
            events.record(event.status);
            event_ids.insert(event.id);
        }

        let mut reservations_received = 0u32;
        let mut total_revenue = Decimal::ZERO;
        let mut period_revenue = Decimal::ZERO;
        for reservation in self.reservations.find_all().await? {
            if !event_ids.contains(&reservation.event_id) {
                continue;
            }
            reservations_received += 1;
            if let Some(amount) = confirmed_amount(&reservation) {
                total_revenue += amount;
                if reservation.reserved_at >= period_start {
                    period_revenue += amount;
                }
            }
        }

        Ok(OrganizerStats {
            organizer_id,
            events,
            reservations_received,
            total_revenue,
            period_revenue,
        })
    }

    /// Platform-wide rollup over every event and reservation.
    pub async fn platform_stats(&self, period_start: i64) -> AppResult<PlatformStats> {
        let mut events = EventStatusCounts::default();
        for event in self.events.find_all().await? {
            events.record(event.status);
        }

        let mut reservations = 0u32;
        let mut clients = HashSet::new();
        let mut total_revenue = Decimal::ZERO;
        let mut period_revenue = Decimal::ZERO;
        for reservation in self.reservations.find_all().await? {
            reservations += 1;
            if reservation.status != ReservationStatus::Cancelled {
                clients.insert(reservation.client_id);
            }
            if let Some(amount) = confirmed_amount(&reservation) {
                total_revenue += amount;
                if reservation.reserved_at >= period_start {
                    period_revenue += amount;
                }
            }
        }

        Ok(PlatformStats {
            events,
            reservations,
            active_clients: clients.len() as u32,
            total_revenue,
            period_revenue,
        })
    }
}

fn confirmed_amount(reservation: &Reservation) -> Option<Decimal> {
    (reservation.status == ReservationStatus::Confirmed).then_some(reservation.total_amount)
}
