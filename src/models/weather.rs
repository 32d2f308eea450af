//! Current-weather reading model

use crate::models::Location;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// One current-weather observation. Ephemeral: held only for the duration
/// of a single render cycle, never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReading {
    /// Resolved location of the observation
    pub location: Location,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Human-readable condition description from the provider
    pub description: String,
    /// Station UTC offset in seconds, used for local-time display
    pub timezone_offset_seconds: i32,
}

impl WeatherReading {
    /// Temperature rounded to the nearest integer for display
    #[must_use]
    pub fn rounded_temperature(&self) -> i32 {
        self.temperature.round() as i32
    }

    /// Format temperature for the results panel, e.g. `25°C`
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.rounded_temperature())
    }

    /// Format humidity for the results panel, e.g. `64%`
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity)
    }

    /// Local time at the station, formatted `YYYY-MM-DD HH:MM`
    #[must_use]
    pub fn format_local_time(&self, now: DateTime<Utc>) -> String {
        let offset = FixedOffset::east_opt(self.timezone_offset_seconds)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        now.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
    }
}
