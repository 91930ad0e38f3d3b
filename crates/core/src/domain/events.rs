use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::SystemTime;

use super::pool::SwapDirection;

/// Default number of swaps kept in the activity log
pub const DEFAULT_EVENT_CAPACITY: usize = 10;

/// A confirmed swap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapEvent {
    pub direction: SwapDirection,

    /// Amount sold, in whole tokens
    pub amount: f64,

    pub tx_hash: String,

    pub timestamp: SystemTime,
}

impl SwapEvent {
    /// Creates an event stamped with the current time
    pub fn new(direction: SwapDirection, amount: f64, tx_hash: impl Into<String>) -> Self {
        Self {
            direction,
            amount,
            tx_hash: tx_hash.into(),
            timestamp: SystemTime::now(),
        }
    }
}

/// Bounded, newest-first log of swaps for one session
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    events: VecDeque<SwapEvent>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    /// Prepends an event, dropping the oldest beyond capacity
    pub fn record(&mut self, event: SwapEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&SwapEvent> {
        self.events.front()
    }

    /// Events, newest first
    pub fn iter(&self) -> impl Iterator<Item = &SwapEvent> {
        self.events.iter()
    }

    pub fn to_vec(&self) -> Vec<SwapEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
