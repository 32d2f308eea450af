//! Dashboard render pipeline
//!
//! One render chain per trigger (startup default city, text search, map
//! click): fetch current weather, recenter the map, fetch air quality,
//! populate the results panel, fetch the forecast and update the chart,
//! then request an AI explanation. A weather or air-quality failure aborts
//! the chain with a user-facing alert naming the query; forecast and AI
//! failures degrade only their own section.
//!
//! Concurrent chains are serialized by outcome, not by execution: every
//! chain gets a generation number, and a chain that has been superseded by
//! a newer one is discarded before it writes to shared display state.

use crate::SkypanelError;
use crate::ai::{PromptVerbosity, TextGenerator, health_prompt};
use crate::config::SkypanelConfig;
use crate::models::forecast::pick_day_segments;
use crate::models::{DaySegment, ForecastSeries, LocationQuery};
use crate::owm::WeatherApiClient;
use crate::views::map::RENDER_ZOOM;
use crate::views::{ChartState, ChartView, MapState, MapView};
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, instrument, warn};

/// Render pipeline state
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderPhase {
    /// Nothing rendered yet
    Idle,
    /// A render chain is fetching provider data
    Fetching,
    /// Display state reflects a completed render
    Rendered,
}

/// Everything the dashboard DOM surface shows for one render
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardView {
    /// Echo of the search input (the typed city, or the coordinate pair a
    /// map click writes, e.g. `41.20000,69.30000`)
    pub search_input: String,
    /// Resolved display name
    pub city: String,
    /// Formatted coordinates, e.g. `41.31°N, 69.28°E`
    pub coordinates: String,
    /// Local time at the station, `YYYY-MM-DD HH:MM`
    pub local_time: String,
    /// Formatted temperature, e.g. `25°C`
    pub temperature: String,
    /// Formatted humidity, e.g. `41%`
    pub humidity: String,
    /// Formatted PM2.5 field
    pub pm2_5: String,
    /// Formatted PM10 field
    pub pm10: String,
    /// AQI category index, 1-5
    pub aqi_value: u8,
    /// AQI status label from the fixed table
    pub aqi_status: String,
    /// AQI column background color from the fixed table
    pub aqi_color: String,
    /// Morning/Afternoon/Evening forecast picks
    pub day_segments: Vec<DaySegment>,
    /// Chart snapshot after this render
    pub chart: Option<ChartState>,
    /// Inline error for the chart region when the forecast fetch failed
    pub chart_error: Option<String>,
    /// Map snapshot after this render
    pub map: MapState,
    /// AI output region: explanation text or an inline error string
    pub ai_output: String,
    /// Render pipeline phase
    pub phase: RenderPhase,
}

/// Mutable display state shared between render chains
#[derive(Debug)]
struct ViewState {
    map: MapView,
    chart: ChartView,
    phase: RenderPhase,
    last: Option<DashboardView>,
}

/// The dashboard orchestrator. Owns the provider clients and the single
/// live map/chart controllers.
pub struct Dashboard {
    weather: WeatherApiClient,
    generator: Arc<dyn TextGenerator>,
    state: Mutex<ViewState>,
    generation: AtomicU64,
    /// In-flight flag for the manual ask path. One slot, no queue.
    ai_slot: Semaphore,
    config: SkypanelConfig,
}

impl Dashboard {
    /// Create the orchestrator with freshly initialized view controllers
    pub fn new(config: SkypanelConfig, generator: Arc<dyn TextGenerator>) -> Result<Self> {
        let weather = WeatherApiClient::new(config.weather.clone())?;
        let map = MapView::initialize(&config.map);
        let mut chart = ChartView::new();
        chart.ensure_initialized();

        Ok(Self {
            weather,
            generator,
            state: Mutex::new(ViewState {
                map,
                chart,
                phase: RenderPhase::Idle,
                last: None,
            }),
            generation: AtomicU64::new(0),
            ai_slot: Semaphore::new(1),
            config,
        })
    }

    /// The query rendered on startup when no search has happened yet
    #[must_use]
    pub fn default_query(&self) -> LocationQuery {
        LocationQuery::City(self.config.weather.default_city.clone())
    }

    /// Run one full render chain for a search query or map click
    #[instrument(skip(self), fields(query = %query.describe()))]
    pub async fn render(&self, query: LocationQuery) -> Result<DashboardView, SkypanelError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Render chain {} started for '{}'", generation, query.describe());
        self.set_phase(generation, RenderPhase::Fetching).await;

        let reading = match &query {
            LocationQuery::City(city) => self.weather.current_by_city(city).await,
            LocationQuery::Coordinates(lat, lon) => {
                self.weather.current_by_coords(*lat, *lon).await
            }
        };
        let reading = match reading {
            Ok(reading) => reading,
            Err(err) => {
                warn!("Weather fetch failed for '{}': {}", query.describe(), err);
                self.restore_phase(generation).await;
                return Err(alert_error(&query, &err));
            }
        };

        let lat = reading.location.latitude;
        let lon = reading.location.longitude;

        {
            let mut state = self.state.lock().await;
            if !self.is_current(generation) {
                debug!("Render chain {} superseded before map recenter", generation);
                return Err(SkypanelError::Superseded);
            }
            state.map.recenter(lat, lon, RENDER_ZOOM);
        }

        let air = match self.weather.air_quality(lat, lon).await {
            Ok(air) => air,
            Err(err) => {
                warn!("Air quality fetch failed for '{}': {}", query.describe(), err);
                self.restore_phase(generation).await;
                return Err(alert_error(&query, &err));
            }
        };

        // Forecast and chart degrade without aborting the chain
        let mut chart_error = None;
        let mut day_segments: Vec<DaySegment> = Vec::new();
        let forecast_series = match self.weather.forecast(lat, lon).await {
            Ok(fetch) => {
                day_segments =
                    pick_day_segments(&fetch.entries, fetch.timezone_offset_seconds, Utc::now());
                Some(ForecastSeries::from_entries(&fetch.entries))
            }
            Err(err) => {
                warn!("Chart update failed: {}", err);
                chart_error = Some(format!("Chart update failed: {err}"));
                None
            }
        };

        let view = {
            let mut state = self.state.lock().await;
            if !self.is_current(generation) {
                debug!("Render chain {} superseded before commit", generation);
                return Err(SkypanelError::Superseded);
            }
            if let Some(series) = &forecast_series {
                state.chart.apply(series);
            }

            let view = DashboardView {
                search_input: query.describe(),
                city: reading.location.display_name(),
                coordinates: reading.location.format_coordinates(),
                local_time: reading.format_local_time(Utc::now()),
                temperature: reading.format_temperature(),
                humidity: reading.format_humidity(),
                pm2_5: air.format_pm2_5(),
                pm10: air.format_pm10(),
                aqi_value: air.category.index(),
                aqi_status: air.category.status_label().to_string(),
                aqi_color: air.category.display_color().to_string(),
                day_segments,
                chart: state.chart.state().cloned(),
                chart_error,
                map: state.map.state().clone(),
                ai_output: "Thinking...".to_string(),
                phase: RenderPhase::Rendered,
            };
            state.phase = RenderPhase::Rendered;
            state.last = Some(view.clone());
            view
        };

        // Automatic explanation. Failures degrade to inline error text and
        // leave the rest of the rendered view intact.
        let prompt = health_prompt(&reading, &air, PromptVerbosity::Short);
        let ai_output = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!("AI explanation failed: {}", err);
                format!("AI Error: {}", ai_error_text(&err))
            }
        };

        let mut state = self.state.lock().await;
        if !self.is_current(generation) {
            debug!("Render chain {} superseded before AI commit", generation);
            return Err(SkypanelError::Superseded);
        }
        let mut view = view;
        view.ai_output = ai_output.clone();
        if let Some(last) = state.last.as_mut() {
            last.ai_output = ai_output;
        }
        info!("Render chain {} committed", generation);
        Ok(view)
    }

    /// Handle a map click: move the marker, then run the same render chain
    /// a text search would, keyed by the clicked coordinates.
    pub async fn map_click(&self, lat: f64, lon: f64) -> Result<DashboardView, SkypanelError> {
        let echo = {
            let mut state = self.state.lock().await;
            state.map.on_click(lat, lon)
        };
        info!("Map click at {}", echo);
        self.render(LocationQuery::Coordinates(lat, lon)).await
    }

    /// Manual ask path. Guarded by the single in-flight slot: a second
    /// submission while one is running is rejected as busy.
    pub async fn ask(&self, prompt: &str) -> Result<String, SkypanelError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SkypanelError::validation("Prompt cannot be empty"));
        }

        let _permit = self
            .ai_slot
            .try_acquire()
            .map_err(|_| SkypanelError::AiBusy)?;

        match self.generator.generate(prompt).await {
            Ok(text) => {
                self.write_ai_output(text.clone()).await;
                Ok(text)
            }
            Err(err) => {
                warn!("Manual AI query failed: {}", err);
                self.write_ai_output(format!("Error: {}", ai_error_text(&err)))
                    .await;
                Err(err)
            }
        }
    }

    /// Latest committed view, if any render has completed
    pub async fn current_view(&self) -> Option<DashboardView> {
        self.state.lock().await.last.clone()
    }

    /// Snapshot of the map state (available before the first render)
    pub async fn map_state(&self) -> MapState {
        self.state.lock().await.map.state().clone()
    }

    /// Current render phase
    pub async fn phase(&self) -> RenderPhase {
        self.state.lock().await.phase
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn set_phase(&self, generation: u64, phase: RenderPhase) {
        let mut state = self.state.lock().await;
        if self.is_current(generation) {
            state.phase = phase;
        }
    }

    /// After an aborted chain the phase falls back to whatever the display
    /// still shows: the previous render, or nothing.
    async fn restore_phase(&self, generation: u64) {
        let mut state = self.state.lock().await;
        if self.is_current(generation) {
            state.phase = if state.last.is_some() {
                RenderPhase::Rendered
            } else {
                RenderPhase::Idle
            };
        }
    }

    async fn write_ai_output(&self, text: String) {
        let mut state = self.state.lock().await;
        if let Some(last) = state.last.as_mut() {
            last.ai_output = text;
        }
    }
}

/// The user-facing alert for an aborted render chain, naming the query.
/// Transport failures without an HTTP status are reported as status 0.
fn alert_error(query: &LocationQuery, err: &SkypanelError) -> SkypanelError {
    let status = match err {
        SkypanelError::Fetch { status, .. } => *status,
        _ => 0,
    };
    SkypanelError::fetch(
        status,
        format!("Could not fetch weather data for {}", query.describe()),
    )
}

/// Message shown after the `AI Error: ` / `Error: ` prefix
fn ai_error_text(err: &SkypanelError) -> String {
    match err {
        SkypanelError::Ai { message } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Generator that stalls long enough for a second ask to collide
    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, SkypanelError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok("advice".to_string())
        }
    }

    fn dashboard(generator: Arc<dyn TextGenerator>) -> Dashboard {
        let config = SkypanelConfig::for_tests(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        Dashboard::new(config, generator).unwrap()
    }

    #[tokio::test]
    async fn test_starts_idle_with_initialized_views() {
        let dashboard = dashboard(Arc::new(SlowGenerator));
        assert_eq!(dashboard.phase().await, RenderPhase::Idle);
        assert!(dashboard.current_view().await.is_none());

        let map = dashboard.map_state().await;
        assert_eq!(map.tile_layers.len(), 2);
    }

    #[tokio::test]
    async fn test_ask_rejects_concurrent_submission() {
        let dashboard = Arc::new(dashboard(Arc::new(SlowGenerator)));

        let first = {
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move { dashboard.ask("is it safe to run?").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = dashboard.ask("second question").await;
        assert!(matches!(second, Err(SkypanelError::AiBusy)));

        let first = first.await.unwrap();
        assert_eq!(first.unwrap(), "advice");

        // The slot frees up once the first call resolves
        let third = dashboard.ask("third question").await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_prompt() {
        let dashboard = dashboard(Arc::new(SlowGenerator));
        assert!(matches!(
            dashboard.ask("   ").await,
            Err(SkypanelError::Validation { .. })
        ));
    }

    #[test]
    fn test_alert_error_names_the_query() {
        let query = LocationQuery::City("Tashkent".to_string());
        let err = alert_error(&query, &SkypanelError::fetch(404, "Weather fetch failed: 404"));
        assert!(matches!(err, SkypanelError::Fetch { status: 404, .. }));
        assert!(err.to_string().contains("Could not fetch weather data for Tashkent"));
    }

    #[test]
    fn test_ai_error_text_unwraps_ai_messages() {
        assert_eq!(ai_error_text(&SkypanelError::ai("Empty response")), "Empty response");
        let other = SkypanelError::validation("bad");
        assert_eq!(ai_error_text(&other), other.to_string());
    }
}
