//! Seams between the engine and its host.
//!
//! The host owns catalog loading and the device location facility; these
//! traits are what it implements or consumes.

use crate::catalog::RouteCatalog;
use crate::error::CatalogError;
use crate::feed::LocationSample;

/// Supplies a route catalog, typically once at startup.
pub trait CatalogSource {
    fn load(&self) -> Result<RouteCatalog, CatalogError>;
}

/// Receives location samples pushed by a [`LocationFeed`](crate::feed::LocationFeed).
pub trait LocationHandler: Send {
    fn on_location(&mut self, sample: &LocationSample);
}

impl<F> LocationHandler for F
where
    F: FnMut(&LocationSample) + Send,
{
    fn on_location(&mut self, sample: &LocationSample) {
        self(sample)
    }
}
