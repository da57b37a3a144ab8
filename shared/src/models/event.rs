//! Event Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Event category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Concert,
    Conference,
    Sport,
    Festival,
    Other,
}

/// Event lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Cancelled,
    Finished,
}

impl EventStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Cancelled | EventStatus::Finished)
    }
}

/// Event entity
///
/// Drafts may be incomplete: `city`, `venue`, `start_time` and
/// `end_time` are only required at publish time. A PUBLISHED event is
/// guaranteed to have all of them set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub city: Option<String>,
    pub venue: Option<String>,
    /// Total seats; fixed admission ceiling (> 0)
    pub capacity: i32,
    /// Unit seat price in currency unit (>= 0)
    pub price: Decimal,
    /// Unix millis; must precede `end_time` when both are set
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub status: EventStatus,
    /// Owning organizer reference
    pub organizer_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub description: Option<String>,
    pub category: EventCategory,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub capacity: i32,
    pub price: Decimal,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

/// Update event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}
