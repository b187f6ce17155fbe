//! Great-circle distance between coordinates.
//!
//! Uses the atan2 form of the haversine formula so that antipodal points
//! still resolve instead of hitting the asin singularity.

use serde::{Deserialize, Serialize};

use crate::catalog::Coordinate;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance on a sphere of configurable radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Haversine {
    pub earth_radius_km: f64,
}

impl Default for Haversine {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl Haversine {
    pub fn new(earth_radius_km: f64) -> Self {
        Self { earth_radius_km }
    }

    /// Distance between two points in kilometers.
    ///
    /// Total over finite input: never negative and symmetric in its arguments.
    pub fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.latitude.to_radians();
        let lat2_rad = to.latitude.to_radians();
        let delta_lat = (to.latitude - from.latitude).to_radians();
        let delta_lng = (to.longitude - from.longitude).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        // Rounding can push h a hair outside [0, 1] for near-antipodal points.
        let h = h.clamp(0.0, 1.0);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        self.earth_radius_km * c
    }
}

/// Haversine distance in kilometers with the mean Earth radius.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    Haversine::default().distance_km(from, to)
}
