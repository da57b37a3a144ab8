//! Per-event serialization
//!
//! Admission control is a read-modify-write over an event's occupied
//! seats: the availability check and the reservation commit must not
//! interleave with another booking on the same event. [`EventLocks`]
//! hands out one async mutex per event id; bookings against different
//! events never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry of per-event booking locks
#[derive(Debug, Default)]
pub struct EventLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for an event.
    ///
    /// The returned handle stays valid even if another caller fetches
    /// the same entry concurrently; both see the same mutex.
    pub fn for_event(&self, event_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(event_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of events with a registered lock (diagnostics only)
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
