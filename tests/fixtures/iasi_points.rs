//! Query points around the built-in Iasi routes.
//!
//! Distances in the comments are haversine km to the relevant stops.

#![allow(dead_code)]

use transit_proximity::haversine::EARTH_RADIUS_KM;
use transit_proximity::polyline::Polyline;
use transit_proximity::{Coordinate, Route, RouteCatalog, Stop};

/// Shared first stop of routes 1, 2 and 3. Every route is within 0.5 km.
pub const HUB: Coordinate = Coordinate::new(47.1585, 27.6014);

/// Second stop of route 1, 0.17285 km from [`HUB`].
pub const ROUTE_1_STOP_2: Coordinate = Coordinate::new(47.1600, 27.6020);

/// Northeast of the hub: routes 1, 2, 3 nearby (0.44, 0.37, 0.45 km), route 4 is 0.63 km out.
pub const NORTHEAST: Coordinate = Coordinate::new(47.164, 27.609);

/// Southwest of the hub: only route 4 (Stop Alpha, 0.375 km) is nearby.
pub const SOUTHWEST: Coordinate = Coordinate::new(47.155, 27.596);

/// 67 m from route 1's Stop 3; 0.252 km from route 2's Stop C.
pub const NEAR_STOP_3: Coordinate = Coordinate::new(47.1625, 27.6045);

/// More than 1.4 km from every stop.
pub const FAR_AWAY: Coordinate = Coordinate::new(47.17, 27.62);

/// The built-in routes as a catalog document, with mixed numeric and string ids.
pub const IASI_CATALOG_JSON: &str = r#"{
    "routes": [
        {
            "id": 1,
            "color": "red",
            "points": [[47.1585, 27.6014], [47.1600, 27.6020], [47.1620, 27.6040]],
            "stops": [
                { "name": "Stop 1", "coords": [47.1585, 27.6014], "time": 0 },
                { "name": "Stop 2", "coords": [47.1600, 27.6020], "time": 2 },
                { "name": "Stop 3", "coords": [47.1620, 27.6040], "time": 5 }
            ]
        },
        {
            "id": "2",
            "color": "blue",
            "points": [[47.1585, 27.6014], [47.1590, 27.6050], [47.1610, 27.6070]],
            "stops": [
                { "name": "Stop A", "coords": [47.1585, 27.6014], "time": 0 },
                { "name": "Stop B", "coords": [47.1590, 27.6050], "time": 3 },
                { "name": "Stop C", "coords": [47.1610, 27.6070], "time": 6 }
            ]
        },
        {
            "id": 3,
            "color": "green",
            "points": [[47.1585, 27.6014], [47.1595, 27.6030], [47.1605, 27.6060]],
            "stops": [
                { "name": "Stop X", "coords": [47.1585, 27.6014], "time": 0 },
                { "name": "Stop Y", "coords": [47.1595, 27.6030], "time": 4 },
                { "name": "Stop Z", "coords": [47.1605, 27.6060], "time": 8 }
            ]
        },
        {
            "id": 4,
            "color": "purple",
            "points": [[47.1570, 27.6000], [47.1580, 27.6020], [47.1590, 27.6050]],
            "stops": [
                { "name": "Stop Alpha", "coords": [47.1570, 27.6000], "time": 0 },
                { "name": "Stop Beta", "coords": [47.1580, 27.6020], "time": 2 },
                { "name": "Stop Gamma", "coords": [47.1590, 27.6050], "time": 4 }
            ]
        }
    ]
}"#;

/// Point due north of `origin` at `km` along the meridian.
pub fn north_of(origin: Coordinate, km: f64) -> Coordinate {
    Coordinate::new(origin.latitude + (km / EARTH_RADIUS_KM).to_degrees(), origin.longitude)
}

/// Route with the given stops and no drawn path.
pub fn route_with_stops(id: &str, stops: &[(&str, Coordinate)]) -> Route {
    Route::new(
        id,
        "gray",
        Polyline::default(),
        stops
            .iter()
            .enumerate()
            .map(|(i, &(name, coordinate))| Stop::new(name, coordinate, i as u32 * 2))
            .collect(),
    )
}

pub fn catalog_of(routes: Vec<Route>) -> RouteCatalog {
    RouteCatalog::new(routes).expect("fixture catalog is valid")
}
