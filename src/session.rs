//! Per-user map session.
//!
//! Holds what the map needs between location fixes: the catalog in use, the
//! selected route, the last accepted fix and whether the map has already been
//! centered on the user. Queries go through the stateless engine.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Coordinate, Route, RouteCatalog, RouteId};
use crate::engine::{EngineOptions, NearestStop, ProximityEngine};
use crate::error::ProximityError;
use crate::feed::LocationSample;

/// A nearby route as the map shows it: a colored badge with the route id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyRoute {
    pub id: RouteId,
    pub color: String,
}

/// Display data computed for one accepted location fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationUpdate {
    pub coordinate: Coordinate,
    pub nearby: Vec<NearbyRoute>,
    /// Nearest stop on the selected route, if a route is selected.
    pub nearest: Option<NearestStop>,
    /// Radius of the accuracy circle drawn around the user.
    pub accuracy_radius_m: f64,
    /// True only for the first accepted fix of the session.
    pub recenter: bool,
}

/// Result of selecting a route: what to draw plus the nearest stop when a fix
/// is already known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSelection {
    pub route: Route,
    pub nearest: Option<NearestStop>,
}

#[derive(Debug, Default)]
struct SessionState {
    selected_route: Option<RouteId>,
    last_fix: Option<(Coordinate, DateTime<Utc>)>,
    centered: bool,
}

#[derive(Debug)]
pub struct MapSession {
    engine: ProximityEngine,
    catalog: RwLock<Arc<RouteCatalog>>,
    state: Mutex<SessionState>,
}

impl MapSession {
    /// Fails when `options` do not validate.
    pub fn new(catalog: RouteCatalog, options: EngineOptions) -> Result<Self, ProximityError> {
        Ok(Self::with_engine(catalog, ProximityEngine::new(options)?))
    }

    fn with_engine(catalog: RouteCatalog, engine: ProximityEngine) -> Self {
        Self {
            engine,
            catalog: RwLock::new(Arc::new(catalog)),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn engine(&self) -> &ProximityEngine {
        &self.engine
    }

    /// Snapshot of the catalog currently in use.
    pub fn catalog(&self) -> Arc<RouteCatalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps in a new catalog. Queries already running keep the old snapshot.
    ///
    /// A selected route that the new catalog lacks is deselected.
    pub fn replace_catalog(&self, catalog: RouteCatalog) {
        let routes = catalog.len();
        let catalog = Arc::new(catalog);

        // Lock order is state, then catalog; the selection and the catalog
        // change together.
        let mut state = self.lock_state();
        if let Some(selected) = &state.selected_route {
            if catalog.get(selected.as_str()).is_none() {
                warn!(route = %selected, "selected route dropped by catalog reload");
                state.selected_route = None;
            }
        }
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = catalog;
        drop(state);

        info!(routes, "route catalog replaced");
    }

    pub fn selected_route(&self) -> Option<RouteId> {
        self.lock_state().selected_route.clone()
    }

    /// Selects a route for display.
    ///
    /// An unknown id leaves the previous selection untouched.
    pub fn select_route(&self, route_id: &str) -> Result<RouteSelection, ProximityError> {
        let (catalog, route, last_fix) = {
            let mut state = self.lock_state();
            // Read under the state lock so a concurrent reload cannot slip in
            // between the lookup and the selection.
            let catalog = self.catalog();
            let route = catalog
                .get(route_id)
                .cloned()
                .ok_or_else(|| ProximityError::RouteNotFound(RouteId::new(route_id)))?;
            state.selected_route = Some(route.id.clone());
            (catalog, route, state.last_fix)
        };

        let nearest = match last_fix {
            Some((coordinate, _)) => {
                Some(self.engine.nearest_stop(route.id.as_str(), coordinate, &catalog)?)
            }
            None => None,
        };

        debug!(route = %route.id, "route selected");
        Ok(RouteSelection { route, nearest })
    }

    pub fn clear_selection(&self) {
        self.lock_state().selected_route = None;
    }

    /// Handles one location fix.
    ///
    /// Returns `Ok(None)` for a fix older than the last accepted one; a
    /// superseded update has nothing left to show.
    pub fn on_location(
        &self,
        sample: &LocationSample,
    ) -> Result<Option<LocationUpdate>, ProximityError> {
        let Coordinate {
            latitude,
            longitude,
        } = sample.coordinate;
        let coordinate = Coordinate::checked(latitude, longitude)
            .inspect_err(|_| warn!(?sample, "rejected location sample"))?;

        let (selected, recenter) = {
            let mut state = self.lock_state();
            if let Some((_, last)) = state.last_fix {
                if sample.timestamp < last {
                    warn!(
                        timestamp = %sample.timestamp,
                        last = %last,
                        "ignoring stale location sample"
                    );
                    return Ok(None);
                }
            }
            state.last_fix = Some((coordinate, sample.timestamp));
            let recenter = !state.centered;
            state.centered = true;
            (state.selected_route.clone(), recenter)
        };

        let catalog = self.catalog();
        let nearby = self
            .engine
            .nearby_routes(coordinate, &catalog)?
            .into_iter()
            .filter_map(|id| {
                catalog.get(id.as_str()).map(|route| NearbyRoute {
                    color: route.display_color.clone(),
                    id,
                })
            })
            .collect();

        let nearest = match selected {
            Some(route_id) => {
                match self.engine.nearest_stop(route_id.as_str(), coordinate, &catalog) {
                    Ok(nearest) => Some(nearest),
                    Err(ProximityError::RouteNotFound(_)) => None,
                    Err(err) => return Err(err),
                }
            }
            None => None,
        };

        Ok(Some(LocationUpdate {
            coordinate,
            nearby,
            nearest,
            accuracy_radius_m: sample.accuracy_meters / 2.0,
            recenter,
        }))
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MapSession {
    fn default() -> Self {
        Self::with_engine(RouteCatalog::builtin(), ProximityEngine::default())
    }
}
