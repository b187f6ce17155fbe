//! Nearest-stop, bike ETA and nearby-route queries.
//!
//! Everything here is a pure function of a coordinate and a catalog. Nothing
//! is cached between calls.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Coordinate, Route, RouteCatalog, RouteId, Stop};
use crate::error::ProximityError;
use crate::haversine::{Haversine, EARTH_RADIUS_KM};

/// Proximity threshold for "nearby" routes.
pub const DEFAULT_RADIUS_KM: f64 = 0.5;

/// Average biking speed assumption for ETA.
pub const DEFAULT_BIKE_SPEED_KMH: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// A route is nearby when one of its stops is strictly closer than this.
    pub radius_km: f64,
    pub average_bike_speed_kmh: f64,
    pub earth_radius_km: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            average_bike_speed_kmh: DEFAULT_BIKE_SPEED_KMH,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

/// Closest stop on a route and the time to bike there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStop {
    pub stop: Stop,
    pub distance_km: f64,
    pub eta_minutes: u32,
}

impl EngineOptions {
    /// Every option must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), ProximityError> {
        let fields = [
            ("radius_km", self.radius_km),
            ("average_bike_speed_kmh", self.average_bike_speed_kmh),
            ("earth_radius_km", self.earth_radius_km),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ProximityError::InvalidOption { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProximityEngine {
    options: EngineOptions,
}

impl ProximityEngine {
    pub fn new(options: EngineOptions) -> Result<Self, ProximityError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn haversine(&self) -> Haversine {
        Haversine::new(self.options.earth_radius_km)
    }

    /// Nearest stop on `route_id` to `user`, with biking ETA.
    ///
    /// Ties go to the stop listed first.
    pub fn nearest_stop(
        &self,
        route_id: &str,
        user: Coordinate,
        catalog: &RouteCatalog,
    ) -> Result<NearestStop, ProximityError> {
        let user = checked(user)?;
        let route = catalog
            .get(route_id)
            .ok_or_else(|| ProximityError::RouteNotFound(RouteId::new(route_id)))?;

        let haversine = self.haversine();
        let mut nearest: Option<(&Stop, f64)> = None;
        for stop in &route.stops {
            let distance = haversine.distance_km(user, stop.coordinate);
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((stop, distance));
            }
        }

        // Catalog construction guarantees at least one stop per route.
        let (stop, distance_km) =
            nearest.ok_or_else(|| ProximityError::RouteNotFound(route.id.clone()))?;
        let eta_minutes = self.eta_minutes(distance_km);

        debug!(
            route = %route.id,
            stop = %stop.name,
            distance_km,
            eta_minutes,
            "nearest stop"
        );

        Ok(NearestStop {
            stop: stop.clone(),
            distance_km,
            eta_minutes,
        })
    }

    /// Routes with at least one stop strictly within the radius, in catalog order.
    pub fn nearby_routes(
        &self,
        user: Coordinate,
        catalog: &RouteCatalog,
    ) -> Result<Vec<RouteId>, ProximityError> {
        let user = checked(user)?;
        let nearby = self.collect_nearby(user, catalog);
        debug!(
            latitude = user.latitude,
            longitude = user.longitude,
            nearby = nearby.len(),
            "nearby routes"
        );
        Ok(nearby)
    }

    /// Nearby-route query for many coordinates at once, e.g. a recorded track.
    ///
    /// Coordinates are evaluated in parallel; results keep the input order.
    pub fn nearby_routes_batch(
        &self,
        users: &[Coordinate],
        catalog: &RouteCatalog,
    ) -> Result<Vec<Vec<RouteId>>, ProximityError> {
        for &user in users {
            checked(user)?;
        }

        Ok(users
            .par_iter()
            .map(|&user| self.collect_nearby(user, catalog))
            .collect())
    }

    /// Biking time in whole minutes, rounded half away from zero.
    pub fn eta_minutes(&self, distance_km: f64) -> u32 {
        let minutes = distance_km / self.options.average_bike_speed_kmh * 60.0;
        minutes.round().max(0.0) as u32
    }

    fn collect_nearby(&self, user: Coordinate, catalog: &RouteCatalog) -> Vec<RouteId> {
        catalog
            .iter()
            .filter(|route| self.has_stop_within(route, user))
            .map(|route| route.id.clone())
            .collect()
    }

    fn has_stop_within(&self, route: &Route, user: Coordinate) -> bool {
        let haversine = self.haversine();
        route
            .stops
            .iter()
            .any(|stop| haversine.distance_km(user, stop.coordinate) < self.options.radius_km)
    }
}

fn checked(user: Coordinate) -> Result<Coordinate, ProximityError> {
    Coordinate::checked(user.latitude, user.longitude)
}

/// Nearest stop on a route with default options.
pub fn find_nearest_stop(
    route_id: &str,
    user: Coordinate,
    catalog: &RouteCatalog,
) -> Result<NearestStop, ProximityError> {
    ProximityEngine::default().nearest_stop(route_id, user, catalog)
}

/// Nearby routes with a caller-chosen radius and otherwise default options.
///
/// Unlike the engine methods this validates neither `user` nor `radius_km`;
/// a NaN coordinate or a non-positive radius simply matches nothing.
pub fn find_nearby_routes(
    user: Coordinate,
    catalog: &RouteCatalog,
    radius_km: f64,
) -> Vec<RouteId> {
    let engine = ProximityEngine {
        options: EngineOptions {
            radius_km,
            ..EngineOptions::default()
        },
    };
    engine.collect_nearby(user, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::Polyline;

    fn route(id: &str, stops: &[(&str, f64, f64)]) -> Route {
        Route::new(
            id,
            "red",
            Polyline::default(),
            stops
                .iter()
                .map(|&(name, lat, lon)| Stop::new(name, Coordinate::new(lat, lon), 0))
                .collect(),
        )
    }

    #[test]
    fn test_eta_rounding() {
        let engine = ProximityEngine::default();
        // 10 km/h: 1 km is 6 minutes
        assert_eq!(engine.eta_minutes(0.0), 0);
        assert_eq!(engine.eta_minutes(1.0), 6);
        // 0.25 km = 1.5 min rounds up
        assert_eq!(engine.eta_minutes(0.25), 2);
        // 0.24 km = 1.44 min rounds down
        assert_eq!(engine.eta_minutes(0.24), 1);
    }

    #[test]
    fn test_eta_respects_speed() {
        let engine = ProximityEngine::new(EngineOptions {
            average_bike_speed_kmh: 20.0,
            ..EngineOptions::default()
        })
        .unwrap();
        assert_eq!(engine.options().average_bike_speed_kmh, 20.0);
        assert_eq!(engine.eta_minutes(10.0), 30);
    }

    #[test]
    fn test_tie_goes_to_first_stop() {
        let catalog = RouteCatalog::new(vec![route(
            "1",
            &[("Far", 47.01, 27.0), ("First", 47.001, 27.0), ("Second", 47.001, 27.0)],
        )])
        .unwrap();
        let nearest = ProximityEngine::default()
            .nearest_stop("1", Coordinate::new(47.0, 27.0), &catalog)
            .unwrap();
        assert_eq!(nearest.stop.name, "First");
    }

    #[test]
    fn test_rejects_nan_user() {
        let catalog = RouteCatalog::builtin();
        let err = ProximityEngine::default()
            .nearest_stop("1", Coordinate::new(f64::NAN, 27.0), &catalog)
            .unwrap_err();
        assert!(matches!(err, ProximityError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_free_function_matches_nothing_for_nan() {
        let catalog = RouteCatalog::builtin();
        assert!(find_nearby_routes(Coordinate::new(f64::NAN, f64::NAN), &catalog, 0.5).is_empty());
    }

    #[test]
    fn test_options_fill_missing_fields() {
        let options: EngineOptions = serde_json::from_str(r#"{"radius_km": 1.0}"#).unwrap();
        assert_eq!(options.radius_km, 1.0);
        assert_eq!(options.average_bike_speed_kmh, DEFAULT_BIKE_SPEED_KMH);
        assert_eq!(options.earth_radius_km, EARTH_RADIUS_KM);
    }

    #[test]
    fn test_options_reject_zero_or_negative_values() {
        for json in [
            r#"{"average_bike_speed_kmh": 0.0}"#,
            r#"{"average_bike_speed_kmh": -10.0}"#,
            r#"{"radius_km": -1.0}"#,
            r#"{"earth_radius_km": 0.0}"#,
        ] {
            let options: EngineOptions = serde_json::from_str(json).unwrap();
            let err = ProximityEngine::new(options).unwrap_err();
            assert!(matches!(err, ProximityError::InvalidOption { .. }), "{}", json);
        }
    }

    #[test]
    fn test_options_reject_non_finite_values() {
        let options = EngineOptions {
            radius_km: f64::NAN,
            ..EngineOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(err, ProximityError::InvalidOption { name: "radius_km", .. }));

        let options = EngineOptions {
            average_bike_speed_kmh: f64::INFINITY,
            ..EngineOptions::default()
        };
        assert!(options.validate().is_err());
        assert!(EngineOptions::default().validate().is_ok());
    }
}
