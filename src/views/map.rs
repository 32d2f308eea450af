//! Map view controller
//!
//! Owns the marker position, the two tile layers (base cartography plus
//! the semi-transparent AQI overlay) and the visible center/zoom. The
//! widget consumes this state as JSON; interaction flows back in through
//! [`MapView::on_click`].

use crate::config::MapConfig;
use crate::models::Location;
use serde::{Deserialize, Serialize};

/// Base cartography tile source
const BASE_TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";
const BASE_TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors & CartoDB";

/// AQI overlay tile source, keyed by a static access token
const AQI_TILE_URL: &str = "https://tiles.waqi.info/tiles/usepa-aqi/{z}/{x}/{y}.png?token={token}";
const AQI_TILE_ATTRIBUTION: &str = "Air Quality Tiles © waqi.info";
const AQI_TILE_OPACITY: f64 = 0.7;

/// Zoom level applied when a render recenters the view on a result
pub const RENDER_ZOOM: u8 = 10;

/// One raster tile source for the map widget
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TileLayer {
    /// URL template with `{z}/{x}/{y}` placeholders
    pub url_template: String,
    /// Attribution line shown by the widget
    pub attribution: String,
    /// Layer opacity, 0.0 to 1.0
    pub opacity: f64,
}

/// Serializable snapshot of the map view
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MapState {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub marker_latitude: f64,
    pub marker_longitude: f64,
    pub tile_layers: Vec<TileLayer>,
}

/// Owning controller for the map widget state
#[derive(Debug, Clone)]
pub struct MapView {
    state: MapState,
}

impl MapView {
    /// Create the map centered on the configured default coordinate with
    /// both tile layers attached and the marker placed at the center.
    #[must_use]
    pub fn initialize(config: &MapConfig) -> Self {
        let layers = vec![
            TileLayer {
                url_template: BASE_TILE_URL.to_string(),
                attribution: BASE_TILE_ATTRIBUTION.to_string(),
                opacity: 1.0,
            },
            TileLayer {
                url_template: AQI_TILE_URL.replace("{token}", &config.tile_token),
                attribution: AQI_TILE_ATTRIBUTION.to_string(),
                opacity: AQI_TILE_OPACITY,
            },
        ];

        Self {
            state: MapState {
                center_latitude: config.default_latitude,
                center_longitude: config.default_longitude,
                zoom: config.default_zoom,
                marker_latitude: config.default_latitude,
                marker_longitude: config.default_longitude,
                tile_layers: layers,
            },
        }
    }

    /// Move both the visible center and the marker
    pub fn recenter(&mut self, lat: f64, lon: f64, zoom: u8) {
        self.state.center_latitude = lat;
        self.state.center_longitude = lon;
        self.state.zoom = zoom;
        self.state.marker_latitude = lat;
        self.state.marker_longitude = lon;
    }

    /// Handle a click on the map: move the marker and return the string
    /// written into the search input, e.g. `41.20000,69.30000`. The caller
    /// triggers the coordinate render.
    pub fn on_click(&mut self, lat: f64, lon: f64) -> String {
        self.state.marker_latitude = lat;
        self.state.marker_longitude = lon;
        Location::new(lat, lon).format_input()
    }

    /// Snapshot for the frontend
    #[must_use]
    pub fn state(&self) -> &MapState {
        &self.state
    }
}
