//! `Skypanel` - Weather and air quality dashboard service
//!
//! This library provides the data-orchestration core behind the dashboard:
//! OpenWeatherMap fetchers, AI health recommendations, and the map/chart
//! view state the browser frontend renders.

pub mod ai;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod owm;
pub mod views;
pub mod web;

// Re-export core types for public API
pub use ai::{GeminiClient, PromptVerbosity, TextGenerator};
pub use config::SkypanelConfig;
pub use dashboard::{Dashboard, DashboardView, RenderPhase};
pub use error::SkypanelError;
pub use models::{
    AirQualitySample, AqiCategory, ForecastSeries, Location, LocationQuery, WeatherReading,
};
pub use owm::WeatherApiClient;
pub use views::{ChartView, MapView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
