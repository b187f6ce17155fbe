//! Test fixtures for transit-proximity.
//!
//! Provides:
//! - Named query points around the Iasi demo routes
//! - The demo catalog as a JSON document
//! - Builders for small synthetic catalogs

pub mod iasi_points;

pub use iasi_points::*;
