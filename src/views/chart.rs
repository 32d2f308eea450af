//! Chart view controller
//!
//! One canonical two-series line chart: temperature on the left axis,
//! humidity on the right. Creation happens exactly once through
//! [`ChartView::ensure_initialized`]; updates replace the label and value
//! arrays in place.

use crate::models::ForecastSeries;
use serde::{Deserialize, Serialize};

const TEMPERATURE_SERIES_NAME: &str = "Temperature (°C)";
const HUMIDITY_SERIES_NAME: &str = "Humidity (%)";

/// Default label grid shown before the first forecast arrives:
/// 00:00 to 22:00 in 2-hour steps.
fn default_labels() -> Vec<String> {
    (0..12).map(|i| format!("{:02}:00", i * 2)).collect()
}

/// Serializable snapshot of the chart
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartState {
    /// X-axis time-of-day labels
    pub labels: Vec<String>,
    /// Left-axis series values
    pub temperature: Vec<i32>,
    /// Right-axis series values
    pub humidity: Vec<u8>,
    /// Left-axis series name
    pub temperature_series: String,
    /// Right-axis series name
    pub humidity_series: String,
}

impl ChartState {
    fn canonical() -> Self {
        let labels = default_labels();
        Self {
            temperature: vec![0; labels.len()],
            humidity: vec![0; labels.len()],
            labels,
            temperature_series: TEMPERATURE_SERIES_NAME.to_string(),
            humidity_series: HUMIDITY_SERIES_NAME.to_string(),
        }
    }
}

/// Owning controller for the chart widget state
#[derive(Debug, Clone, Default)]
pub struct ChartView {
    state: Option<ChartState>,
}

impl ChartView {
    /// Create an empty, uninitialized chart controller
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the chart with the canonical configuration. Idempotent: a
    /// chart that already exists is left untouched.
    pub fn ensure_initialized(&mut self) -> &ChartState {
        self.state.get_or_insert_with(ChartState::canonical)
    }

    /// Replace labels and both series in place with the forecast series
    pub fn apply(&mut self, series: &ForecastSeries) {
        let state = self.state.get_or_insert_with(ChartState::canonical);
        state.labels = series.points.iter().map(|p| p.label.clone()).collect();
        state.temperature = series.points.iter().map(|p| p.temperature).collect();
        state.humidity = series.points.iter().map(|p| p.humidity).collect();
    }

    /// Explicit reset back to the canonical empty configuration
    pub fn reset(&mut self) {
        self.state = Some(ChartState::canonical());
    }

    /// Snapshot for the frontend, if the chart has been created
    #[must_use]
    pub fn state(&self) -> Option<&ChartState> {
        self.state.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastEntry, ForecastSeries};

    fn series(hours: &[i64]) -> ForecastSeries {
        let entries: Vec<ForecastEntry> = hours
            .iter()
            .map(|h| ForecastEntry {
                timestamp: h * 3600,
                temperature: 20.0 + *h as f64,
                humidity: 50,
                description: String::new(),
            })
            .collect();
        ForecastSeries::from_entries(&entries)
    }

    #[test]
    fn test_canonical_configuration() {
        let mut view = ChartView::new();
        assert!(view.state().is_none());

        let state = view.ensure_initialized();
        assert_eq!(state.labels.len(), 12);
        assert_eq!(state.labels[0], "00:00");
        assert_eq!(state.labels[11], "22:00");
        assert_eq!(state.temperature, vec![0; 12]);
        assert_eq!(state.temperature_series, "Temperature (°C)");
        assert_eq!(state.humidity_series, "Humidity (%)");
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let mut view = ChartView::new();
        view.apply(&series(&[9, 12, 15]));
        let before = view.state().unwrap().clone();

        view.ensure_initialized();
        assert_eq!(view.state().unwrap(), &before);
    }

    #[test]
    fn test_apply_replaces_series_in_place() {
        let mut view = ChartView::new();
        view.ensure_initialized();

        view.apply(&series(&[9, 12]));
        let state = view.state().unwrap();
        assert_eq!(state.labels, vec!["09:00", "12:00"]);
        assert_eq!(state.temperature, vec![29, 32]);
        assert_eq!(state.humidity, vec![50, 50]);
    }

    #[test]
    fn test_apply_creates_chart_when_missing() {
        let mut view = ChartView::new();
        view.apply(&series(&[6]));
        assert_eq!(view.state().unwrap().labels, vec!["06:00"]);
    }

    #[test]
    fn test_reset_restores_canonical_configuration() {
        let mut view = ChartView::new();
        view.apply(&series(&[9, 12, 15]));
        view.reset();

        let state = view.state().unwrap();
        assert_eq!(state.labels.len(), 12);
        assert_eq!(state.temperature, vec![0; 12]);
    }
}
