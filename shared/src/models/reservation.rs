//! Reservation Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Reservation entity
///
/// `unit_price` is frozen at booking time: a copy of the event's price
/// at the moment of creation, never a live reference. Reservations are
/// never destroyed, only transitioned to CANCELLED.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: i64,
    pub event_id: i64,
    /// Owning client reference
    pub client_id: i64,
    /// Seats booked (1..=10)
    pub seat_count: i32,
    /// Price per seat, frozen at booking time
    pub unit_price: Decimal,
    /// Always `seat_count * unit_price`
    pub total_amount: Decimal,
    /// Globally unique booking code; never recycled
    pub code: String,
    pub status: ReservationStatus,
    pub comment: Option<String>,
    pub reserved_at: i64,
}

impl Reservation {
    /// Whether this reservation still counts against event capacity.
    pub fn occupies_seats(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }
}
