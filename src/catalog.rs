//! Route catalog data model.
//!
//! The catalog is validated once when it is built and is read-only after
//! that. Routes keep the order in which the loader supplied them; nearby-route
//! results follow that order.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{CatalogError, ProximityError};
use crate::polyline::Polyline;

/// A (latitude, longitude) pair in decimal degrees.
///
/// Serialized as a two-element array, `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, ProximityError> {
        let coordinate = Self::new(latitude, longitude);
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(ProximityError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]. NaN fails.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coordinate: Coordinate) -> Self {
        (coordinate.latitude, coordinate.longitude)
    }
}

/// Canonical route key.
///
/// Numeric and textual keys normalize to the same string, so route `1` and
/// route `"1"` are one route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RouteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RouteId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<u32> for RouteId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RouteId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RouteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRouteId {
            Number(i64),
            Text(String),
        }

        Ok(match RawRouteId::deserialize(deserializer)? {
            RawRouteId::Number(id) => RouteId::from(id),
            RawRouteId::Text(id) => RouteId::new(id),
        })
    }
}

/// A named stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    #[serde(rename = "coords")]
    pub coordinate: Coordinate,
    /// Minutes from route start; shown to riders, not used for ETA.
    #[serde(rename = "time", default)]
    pub scheduled_offset_minutes: u32,
}

impl Stop {
    pub fn new(
        name: impl Into<String>,
        coordinate: Coordinate,
        scheduled_offset_minutes: u32,
    ) -> Self {
        Self {
            name: name.into(),
            coordinate,
            scheduled_offset_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    #[serde(rename = "color")]
    pub display_color: String,
    #[serde(rename = "points", default)]
    pub path: Polyline,
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn new(
        id: impl Into<RouteId>,
        display_color: impl Into<String>,
        path: Polyline,
        stops: Vec<Stop>,
    ) -> Self {
        Self {
            id: id.into(),
            display_color: display_color.into(),
            path,
            stops,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.id.as_str().is_empty() {
            return Err(CatalogError::EmptyRouteId);
        }
        if self.stops.is_empty() {
            return Err(CatalogError::EmptyRoute(self.id.clone()));
        }

        let coordinates = self
            .path
            .points()
            .iter()
            .chain(self.stops.iter().map(|stop| &stop.coordinate));
        for coordinate in coordinates {
            if !coordinate.is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    route: self.id.clone(),
                    latitude: coordinate.latitude,
                    longitude: coordinate.longitude,
                });
            }
        }

        Ok(())
    }
}

/// Validated, read-only collection of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteCatalog {
    routes: Vec<Route>,
    index: HashMap<RouteId, usize>,
}

impl RouteCatalog {
    /// Builds a catalog, checking every route.
    ///
    /// Fails on a route without stops, an invalid coordinate, an empty id,
    /// or an id that repeats after normalization.
    pub fn new(routes: Vec<Route>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(routes.len());

        for (position, route) in routes.iter().enumerate() {
            route.validate()?;
            if index.insert(route.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateRoute(route.id.clone()));
            }
        }

        debug!(routes = routes.len(), "route catalog built");
        Ok(Self { routes, index })
    }

    pub fn get(&self, id: &str) -> Option<&Route> {
        self.index.get(id.trim()).map(|&position| &self.routes[position])
    }

    /// Routes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The four routes drawn by the Iasi demo map.
    pub fn builtin() -> Self {
        let route = |id: u32, color: &str, stops: [(&str, (f64, f64), u32); 3]| {
            let stops: Vec<Stop> = stops
                .into_iter()
                .map(|(name, coords, time)| Stop::new(name, coords.into(), time))
                .collect();
            let path = Polyline::new(stops.iter().map(|stop| stop.coordinate).collect());
            Route::new(id, color, path, stops)
        };

        let routes = vec![
            route(
                1,
                "red",
                [
                    ("Stop 1", (47.1585, 27.6014), 0),
                    ("Stop 2", (47.1600, 27.6020), 2),
                    ("Stop 3", (47.1620, 27.6040), 5),
                ],
            ),
            route(
                2,
                "blue",
                [
                    ("Stop A", (47.1585, 27.6014), 0),
                    ("Stop B", (47.1590, 27.6050), 3),
                    ("Stop C", (47.1610, 27.6070), 6),
                ],
            ),
            route(
                3,
                "green",
                [
                    ("Stop X", (47.1585, 27.6014), 0),
                    ("Stop Y", (47.1595, 27.6030), 4),
                    ("Stop Z", (47.1605, 27.6060), 8),
                ],
            ),
            route(
                4,
                "purple",
                [
                    ("Stop Alpha", (47.1570, 27.6000), 0),
                    ("Stop Beta", (47.1580, 27.6020), 2),
                    ("Stop Gamma", (47.1590, 27.6050), 4),
                ],
            ),
        ];

        let index = routes
            .iter()
            .enumerate()
            .map(|(position, route)| (route.id.clone(), position))
            .collect();
        Self { routes, index }
    }
}
