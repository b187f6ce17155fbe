//! Location sample subscription.
//!
//! A location provider publishes samples; every subscribed handler sees each
//! sample in subscription order. Unsubscribing stops delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog::Coordinate;
use crate::traits::LocationHandler;

/// One fix from the device location facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub coordinate: Coordinate,
    pub accuracy_meters: f64,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(coordinate: Coordinate, accuracy_meters: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            accuracy_meters,
            timestamp,
        }
    }

    /// Sample stamped with the current time.
    pub fn now(coordinate: Coordinate, accuracy_meters: f64) -> Self {
        Self::new(coordinate, accuracy_meters, Utc::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct LocationFeed {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Box<dyn LocationHandler>)>,
}

impl LocationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<H>(&mut self, handler: H) -> SubscriptionId
    where
        H: LocationHandler + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Delivers `sample` to every handler; returns how many were notified.
    pub fn publish(&mut self, sample: &LocationSample) -> usize {
        for (_, handler) in &mut self.handlers {
            handler.on_location(sample);
        }
        trace!(handlers = self.handlers.len(), "published location sample");
        self.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}
