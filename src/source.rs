//! Catalog loaders: JSON text, JSON files and HTTP endpoints.
//!
//! Document shape:
//!
//! ```json
//! { "routes": [ { "id": 1, "color": "red",
//!                 "points": [[47.1585, 27.6014], [47.16, 27.602]],
//!                 "stops": [ { "name": "Stop 1", "coords": [47.1585, 27.6014], "time": 0 } ] } ] }
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::catalog::{Route, RouteCatalog};
use crate::error::CatalogError;
use crate::traits::CatalogSource;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    routes: Vec<Route>,
}

/// Parses and validates a catalog document.
pub fn parse_catalog(json: &str) -> Result<RouteCatalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(json)?;
    RouteCatalog::new(document.routes)
}

/// Catalog read from JSON text held in memory or from a file.
#[derive(Debug, Clone)]
pub enum JsonCatalogSource {
    Text(String),
    File(PathBuf),
}

impl JsonCatalogSource {
    pub fn text(json: impl Into<String>) -> Self {
        Self::Text(json.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(&self) -> Result<RouteCatalog, CatalogError> {
        let catalog = match self {
            Self::Text(json) => {
                let catalog = parse_catalog(json)?;
                info!(bytes = json.len(), routes = catalog.len(), "loaded route catalog");
                catalog
            }
            Self::File(path) => {
                let json = fs::read_to_string(path)?;
                let catalog = parse_catalog(&json)?;
                info!(path = %path.display(), routes = catalog.len(), "loaded route catalog");
                catalog
            }
        };
        Ok(catalog)
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/routes.json".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Catalog fetched with a blocking GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    config: HttpCatalogConfig,
    client: reqwest::blocking::Client,
}

impl HttpCatalogSource {
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpCatalogConfig {
        &self.config
    }
}

impl CatalogSource for HttpCatalogSource {
    fn load(&self) -> Result<RouteCatalog, CatalogError> {
        let body = self
            .client
            .get(&self.config.url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())?;

        let catalog = parse_catalog(&body)?;
        info!(url = %self.config.url, routes = catalog.len(), "fetched route catalog");
        Ok(catalog)
    }
}
