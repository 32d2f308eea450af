//! Location model and search-input parsing

use crate::SkypanelError;
use serde::{Deserialize, Serialize};

/// Geographic coordinates with an optional display name
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (WGS84)
    pub latitude: f64,
    /// Longitude in decimal degrees (WGS84)
    pub longitude: f64,
    /// Display name (city), when known
    pub name: Option<String>,
}

impl Location {
    /// Create a new location without a display name
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    /// Create a location with a display name
    #[must_use]
    pub fn with_name(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name: Some(name),
        }
    }

    /// Display name, falling back to formatted coordinates
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.format_coordinates())
    }

    /// Format coordinates for the results panel, e.g. `41.31°N, 69.28°E`
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.2}°N, {:.2}°E", self.latitude, self.longitude)
    }

    /// Format coordinates the way a map click writes them into the search
    /// input, e.g. `41.20000,69.30000`
    #[must_use]
    pub fn format_input(&self) -> String {
        format!("{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Parsed search input: a city name or a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text city name
    City(String),
    /// Explicit latitude/longitude pair
    Coordinates(f64, f64),
}

impl LocationQuery {
    /// Parse search input. Anything that reads as a numeric pair is a
    /// coordinate query (range-checked); everything else is a city name.
    pub fn parse(input: &str) -> Result<Self, SkypanelError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(SkypanelError::validation("Location cannot be empty"));
        }

        let Some((lat, lon)) = Self::split_coordinates(input) else {
            return Ok(LocationQuery::City(input.to_string()));
        };

        if !(-90.0..=90.0).contains(&lat) {
            return Err(SkypanelError::validation(format!(
                "Latitude must be between -90 and 90, got: {lat}"
            )));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(SkypanelError::validation(format!(
                "Longitude must be between -180 and 180, got: {lon}"
            )));
        }

        Ok(LocationQuery::Coordinates(lat, lon))
    }

    /// Split input like "41.3123,69.2787" or "41.3123 69.2787" into a
    /// numeric pair, or `None` when it does not look like coordinates
    fn split_coordinates(input: &str) -> Option<(f64, f64)> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return None;
        }

        let lat = parts[0].parse::<f64>().ok()?;
        let lon = parts[1].parse::<f64>().ok()?;
        Some((lat, lon))
    }

    /// The label used in user-facing messages about this query
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            LocationQuery::City(city) => city.clone(),
            LocationQuery::Coordinates(lat, lon) => format!("{lat:.5},{lon:.5}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_city_name() {
        let query = LocationQuery::parse("Tashkent").unwrap();
        assert_eq!(query, LocationQuery::City("Tashkent".to_string()));
    }

    #[test]
    fn test_parse_city_name_with_spaces() {
        let query = LocationQuery::parse("  New York  ").unwrap();
        assert_eq!(query, LocationQuery::City("New York".to_string()));
    }

    #[rstest]
    #[case("41.3123,69.2787")]
    #[case("41.3123, 69.2787")]
    #[case("41.3123 69.2787")]
    fn test_parse_coordinates(#[case] input: &str) {
        let query = LocationQuery::parse(input).unwrap();
        assert_eq!(query, LocationQuery::Coordinates(41.3123, 69.2787));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(LocationQuery::parse("   ").is_err());
    }

    #[rstest]
    #[case("91.0,0.0")]
    #[case("-91.0,0.0")]
    #[case("0.0,181.0")]
    #[case("0.0,-181.0")]
    fn test_parse_rejects_out_of_range_coordinates(#[case] input: &str) {
        assert!(LocationQuery::parse(input).is_err());
    }

    #[test]
    fn test_format_input_matches_map_click_echo() {
        let location = Location::new(41.2, 69.3);
        assert_eq!(location.format_input(), "41.20000,69.30000");
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::with_name(41.3123, 69.2787, "Tashkent".to_string());
        assert_eq!(location.format_coordinates(), "41.31°N, 69.28°E");
        assert_eq!(location.display_name(), "Tashkent");
    }

    #[test]
    fn test_display_name_falls_back_to_coordinates() {
        let location = Location::new(41.3123, 69.2787);
        assert_eq!(location.display_name(), "41.31°N, 69.28°E");
    }
}
