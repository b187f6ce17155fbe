//! transit-proximity core
//!
//! Nearest-stop, bike ETA and nearby-route queries over a static route catalog.

pub mod traits;
pub mod error;
pub mod catalog;
pub mod engine;
pub mod haversine;
pub mod polyline;
pub mod source;
pub mod feed;
pub mod session;

pub use catalog::{Coordinate, Route, RouteCatalog, RouteId, Stop};
pub use engine::{
    find_nearby_routes, find_nearest_stop, EngineOptions, NearestStop, ProximityEngine,
};
pub use error::{CatalogError, ProximityError};
pub use haversine::distance_km;
