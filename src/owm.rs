//! OpenWeatherMap API client
//!
//! One GET per dashboard data source: current weather (by city name or by
//! coordinates), air pollution, and the 3-hour forecast. Each call parses
//! the JSON body on a 2xx status and fails with a fetch error carrying the
//! HTTP status otherwise. No retry and no backoff.

use crate::SkypanelError;
use crate::config::WeatherConfig;
use crate::models::{AirQualitySample, ForecastEntry, Location, WeatherReading};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Forecast payload: the raw entries plus the station UTC offset used for
/// day-segment picking.
#[derive(Debug, Clone)]
pub struct ForecastFetch {
    pub entries: Vec<ForecastEntry>,
    pub timezone_offset_seconds: i32,
}

/// HTTP client for the OpenWeatherMap API family
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Skypanel/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Get current weather for a city name (geocoded by the provider)
    #[instrument(skip(self))]
    pub async fn current_by_city(&self, city: &str) -> Result<WeatherReading, SkypanelError> {
        let url = format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.config.base_url,
            urlencoding::encode(city),
            self.config.api_key
        );
        let response: openweather::CurrentResponse = self.get_json(&url, "Weather").await?;
        info!(
            "Current weather for '{}': {:.1}°C, {}% humidity",
            city, response.main.temp, response.main.humidity
        );
        Ok(response.into())
    }

    /// Get current weather for a coordinate pair
    #[instrument(skip(self))]
    pub async fn current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherReading, SkypanelError> {
        let url = format!(
            "{}/weather?lat={lat}&lon={lon}&appid={}&units=metric",
            self.config.base_url, self.config.api_key
        );
        let response: openweather::CurrentResponse = self.get_json(&url, "Weather").await?;
        Ok(response.into())
    }

    /// Get the current air-quality sample for a coordinate pair
    #[instrument(skip(self))]
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQualitySample, SkypanelError> {
        let url = format!(
            "{}/air_pollution?lat={lat}&lon={lon}&appid={}",
            self.config.base_url, self.config.api_key
        );
        let response: openweather::AirPollutionResponse = self.get_json(&url, "AQI").await?;
        response.into_sample()
    }

    /// Get the 3-hour forecast list for a coordinate pair
    #[instrument(skip(self))]
    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<ForecastFetch, SkypanelError> {
        let url = format!(
            "{}/forecast?lat={lat}&lon={lon}&appid={}&units=metric",
            self.config.base_url, self.config.api_key
        );
        let response: openweather::ForecastResponse = self.get_json(&url, "Forecast").await?;
        info!("Forecast returned {} entries", response.list.len());
        Ok(response.into())
    }

    /// Issue one GET and parse the JSON body. Non-2xx statuses become
    /// fetch errors named after the data source.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, SkypanelError> {
        debug!(
            "GET {}",
            url.split("appid=").next().unwrap_or(url).trim_end_matches('&')
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("{} fetch failed with HTTP {}", what, status.as_u16());
            return Err(SkypanelError::fetch(
                status.as_u16(),
                format!("{what} fetch failed: {}", status.as_u16()),
            ));
        }

        Ok(response.json().await?)
    }
}

/// OpenWeatherMap response structures and conversion utilities
mod openweather {
    use super::{
        AirQualitySample, ForecastEntry, ForecastFetch, Location, SkypanelError, WeatherReading,
    };
    use crate::models::AqiCategory;
    use serde::Deserialize;

    /// Current weather response from `/weather`
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub coord: Coord,
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub timezone: i32,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionData {
        #[serde(default)]
        pub description: String,
    }

    /// Air pollution response from `/air_pollution`
    #[derive(Debug, Deserialize)]
    pub struct AirPollutionResponse {
        #[serde(default)]
        pub list: Vec<AirPollutionEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionEntry {
        pub main: AirPollutionMain,
        pub components: AirPollutionComponents,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionMain {
        pub aqi: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionComponents {
        pub pm2_5: f64,
        pub pm10: f64,
    }

    /// Forecast response from `/forecast`
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastListEntry>,
        pub city: Option<ForecastCity>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastListEntry {
        pub dt: i64,
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<ConditionData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastCity {
        #[serde(default)]
        pub timezone: i32,
    }

    impl From<CurrentResponse> for WeatherReading {
        fn from(response: CurrentResponse) -> Self {
            let location = if response.name.is_empty() {
                Location::new(response.coord.lat, response.coord.lon)
            } else {
                Location::with_name(response.coord.lat, response.coord.lon, response.name)
            };

            WeatherReading {
                location,
                temperature: response.main.temp,
                humidity: response.main.humidity,
                description: response
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_default(),
                timezone_offset_seconds: response.timezone,
            }
        }
    }

    impl AirPollutionResponse {
        /// The provider wraps the sample in a one-element list
        pub fn into_sample(self) -> Result<AirQualitySample, SkypanelError> {
            let entry = self
                .list
                .into_iter()
                .next()
                .ok_or_else(|| SkypanelError::validation("Air pollution response has no data"))?;

            Ok(AirQualitySample {
                category: AqiCategory::from_index(entry.main.aqi)?,
                pm2_5: entry.components.pm2_5,
                pm10: entry.components.pm10,
            })
        }
    }

    impl From<ForecastResponse> for ForecastFetch {
        fn from(response: ForecastResponse) -> Self {
            let timezone_offset_seconds = response.city.map_or(0, |c| c.timezone);
            let entries = response
                .list
                .into_iter()
                .map(|entry| ForecastEntry {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    humidity: entry.main.humidity,
                    description: entry
                        .weather
                        .first()
                        .map(|w| w.description.clone())
                        .unwrap_or_default(),
                })
                .collect();

            ForecastFetch {
                entries,
                timezone_offset_seconds,
            }
        }
    }
}
