//! View-state controllers for the dashboard widgets
//!
//! The map and chart widgets themselves live in the frontend; these
//! controllers own the canonical state those widgets render. Exactly one
//! live instance of each exists per session, owned by the render pipeline
//! and never recreated implicitly.

pub mod chart;
pub mod map;

pub use chart::{ChartState, ChartView};
pub use map::{MapState, MapView, TileLayer};
