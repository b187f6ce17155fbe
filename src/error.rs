use thiserror::Error;

use crate::catalog::RouteId;

/// Failures of a proximity query.
#[derive(Debug, Error)]
pub enum ProximityError {
    #[error("route {0} not found in catalog")]
    RouteNotFound(RouteId),
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("engine option {name} must be finite and positive, got {value}")]
    InvalidOption { name: &'static str, value: f64 },
}

/// Failures while building or loading a route catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("route {0} has no stops")]
    EmptyRoute(RouteId),
    #[error("route {0} appears more than once")]
    DuplicateRoute(RouteId),
    #[error("route identifier is empty")]
    EmptyRouteId,
    #[error("route {route}: invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        route: RouteId,
        latitude: f64,
        longitude: f64,
    },
    #[error("malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),
}
