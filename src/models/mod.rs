//! Core data models for the Skypanel dashboard

pub mod air_quality;
pub mod forecast;
pub mod location;
pub mod weather;

pub use air_quality::{AirQualitySample, AqiCategory};
pub use forecast::{DaySegment, ForecastEntry, ForecastSeries};
pub use location::{Location, LocationQuery};
pub use weather::WeatherReading;
