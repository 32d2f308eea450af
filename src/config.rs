//! Configuration management for the Skypanel application
//!
//! All provider credentials are brokered server-side: they are read from
//! environment variables at startup and never leave the process except as
//! query parameters on outbound provider requests. The frontend only ever
//! sees the tile URL template it needs for the AQI overlay.

use crate::SkypanelError;
use anyhow::{Context, Result};
use std::env;

/// Root configuration for the Skypanel application
#[derive(Debug, Clone)]
pub struct SkypanelConfig {
    /// OpenWeatherMap configuration
    pub weather: WeatherConfig,
    /// Gemini text-generation configuration
    pub ai: AiConfig,
    /// Map view configuration
    pub map: MapConfig,
    /// Web server configuration
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,
    /// Base URL for the weather API family
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// City rendered on startup when no query has been made yet
    pub default_city: String,
}

/// Gemini API configuration settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model identifier, e.g. "gemini-2.0-flash"
    pub model: String,
    /// Base URL for the generateContent endpoint
    pub base_url: String,
}

/// Map view configuration settings
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Access token for the WAQI air-quality tile overlay
    pub tile_token: String,
    /// Default map center latitude
    pub default_latitude: f64,
    /// Default map center longitude
    pub default_longitude: f64,
    /// Default zoom level on startup
    pub default_zoom: u8,
}

/// Web server configuration settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP API listens on
    pub port: u16,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_weather_timeout() -> u32 {
    20
}

fn default_city() -> String {
    "Tashkent".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl SkypanelConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let weather_api_key =
            env::var("OPENWEATHER_API_KEY").context("Missing OPENWEATHER_API_KEY env var")?;
        let ai_api_key = env::var("GEMINI_API_KEY").context("Missing GEMINI_API_KEY env var")?;
        let tile_token =
            env::var("WAQI_TILE_TOKEN").context("Missing WAQI_TILE_TOKEN env var")?;

        let config = Self {
            weather: WeatherConfig {
                api_key: weather_api_key,
                base_url: env::var("OPENWEATHER_BASE_URL")
                    .unwrap_or_else(|_| default_weather_base_url()),
                timeout_seconds: env::var("SKYPANEL_HTTP_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_weather_timeout),
                default_city: env::var("SKYPANEL_DEFAULT_CITY").unwrap_or_else(|_| default_city()),
            },
            ai: AiConfig {
                api_key: ai_api_key,
                model: env::var("GEMINI_MODEL").unwrap_or_else(|_| default_ai_model()),
                base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| default_ai_base_url()),
            },
            map: MapConfig {
                tile_token,
                default_latitude: 41.3123,
                default_longitude: 69.2787,
                default_zoom: 6,
            },
            server: ServerConfig {
                port: env::var("SKYPANEL_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_server_port),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(SkypanelError::config("OpenWeatherMap API key is empty").into());
        }
        if self.ai.api_key.trim().is_empty() {
            return Err(SkypanelError::config("Gemini API key is empty").into());
        }
        if self.map.tile_token.trim().is_empty() {
            return Err(SkypanelError::config("WAQI tile token is empty").into());
        }
        if self.weather.timeout_seconds == 0 {
            return Err(SkypanelError::config("HTTP timeout must be non-zero").into());
        }
        Ok(())
    }
}

#[cfg(test)]
impl SkypanelConfig {
    /// Configuration used by tests. Base URLs point at mock servers.
    pub fn for_tests(weather_base_url: String, ai_base_url: String) -> Self {
        Self {
            weather: WeatherConfig {
                api_key: "test-owm-key".to_string(),
                base_url: weather_base_url,
                timeout_seconds: 5,
                default_city: default_city(),
            },
            ai: AiConfig {
                api_key: "test-gemini-key".to_string(),
                model: default_ai_model(),
                base_url: ai_base_url,
            },
            map: MapConfig {
                tile_token: "test-tile-token".to_string(),
                default_latitude: 41.3123,
                default_longitude: 69.2787,
                default_zoom: 6,
            },
            server: ServerConfig { port: 0 },
        }
    }
}
