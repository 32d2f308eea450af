//! Forecast series derived from the provider's 3-hour forecast list

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Number of forecast entries shown on the chart (~36 hours at 3-hour
/// sampling). The provider list is always truncated to this prefix.
pub const MAX_CHART_POINTS: usize = 12;

/// One raw forecast entry, already converted from the provider response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Forecast timestamp as Unix epoch seconds
    pub timestamp: i64,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Condition description from the provider
    pub description: String,
}

impl ForecastEntry {
    /// Hour label for the chart axis: zero-padded two-digit hour of day
    /// with a literal `:00` suffix, derived from the epoch hour.
    #[must_use]
    pub fn hour_label(&self) -> String {
        let hour = DateTime::<Utc>::from_timestamp(self.timestamp, 0)
            .map_or(0, |dt| dt.hour());
        format!("{hour:02}:00")
    }
}

/// One chart point: (time-of-day label, temperature, humidity)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Time-of-day label, e.g. `09:00`
    pub label: String,
    /// Temperature rounded to the nearest degree
    pub temperature: i32,
    /// Relative humidity in percent
    pub humidity: u8,
}

/// Ordered chart series of up to [`MAX_CHART_POINTS`] points
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Build a series by taking a prefix of the forecast list, regardless
    /// of the provider's actual sampling interval.
    #[must_use]
    pub fn from_entries(entries: &[ForecastEntry]) -> Self {
        let points = entries
            .iter()
            .take(MAX_CHART_POINTS)
            .map(|entry| ForecastPoint {
                label: entry.hour_label(),
                temperature: entry.temperature.round() as i32,
                humidity: entry.humidity,
            })
            .collect();
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One Morning/Afternoon/Evening pick from the next-day forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaySegment {
    /// Segment name: "Morning", "Afternoon" or "Evening"
    pub name: String,
    /// Local time of the chosen entry, formatted `YYYY-MM-DD HH:MM`
    pub time: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Condition description
    pub description: String,
}

/// Segment names and their target local hours
const SEGMENT_TARGETS: [(&str, u32); 3] = [("Morning", 9), ("Afternoon", 15), ("Evening", 21)];

/// Pick the forecast entries closest to morning (09:00), afternoon (15:00)
/// and evening (21:00) local time on the target date. Past 21:00 local the
/// target rolls over to the next day. Segments with no entry on the target
/// date are omitted.
#[must_use]
pub fn pick_day_segments(
    entries: &[ForecastEntry],
    timezone_offset_seconds: i32,
    now: DateTime<Utc>,
) -> Vec<DaySegment> {
    let offset = FixedOffset::east_opt(timezone_offset_seconds)
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    let now_local = now.with_timezone(&offset);

    let mut target_date = now_local.date_naive();
    if now_local.hour() >= 21 {
        target_date += Duration::days(1);
    }

    let mut segments = Vec::new();

    for (name, target_hour) in SEGMENT_TARGETS {
        let mut best: Option<(&ForecastEntry, u32)> = None;

        for entry in entries {
            let Some(dt) = DateTime::<Utc>::from_timestamp(entry.timestamp, 0) else {
                continue;
            };
            let local = dt.with_timezone(&offset);
            if local.date_naive() != target_date {
                continue;
            }
            let diff = local.hour().abs_diff(target_hour);
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((entry, diff));
            }
        }

        if let Some((entry, _)) = best {
            let local = DateTime::<Utc>::from_timestamp(entry.timestamp, 0)
                .unwrap_or(now)
                .with_timezone(&offset);
            segments.push(DaySegment {
                name: name.to_string(),
                time: local.format("%Y-%m-%d %H:%M").to_string(),
                temperature: entry.temperature,
                description: entry.description.clone(),
            });
        }
    }

    segments
}
