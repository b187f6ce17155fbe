//! Route path geometry.
//!
//! A route's drawn path is its own vertex list; it does not have to pass
//! through the stop coordinates.

use serde::{Deserialize, Serialize};

use crate::catalog::Coordinate;
use crate::haversine::Haversine;

/// Ordered path vertices of a route, as drawn on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of haversine distances between consecutive vertices, in km.
    pub fn length_km(&self, haversine: &Haversine) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine.distance_km(pair[0], pair[1]))
            .sum()
    }
}

impl From<Vec<(f64, f64)>> for Polyline {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Coordinate::from).collect())
    }
}
