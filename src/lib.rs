//! chart-dashboard: reactive chart-update engine for small data dashboards.
//!
//! Named user inputs (dataset key, date range, chart kind, category) drive a
//! fixed set of output slots. Every input change recomputes the affected
//! slots from one input snapshot: fetch the dataset, filter/aggregate it,
//! build renderer-agnostic chart specs, and publish a complete output set.

pub mod api;
pub mod chart;
pub mod core;
pub mod data;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod transform;

pub use api::{DashboardConfig, InputEvent, InputState, OutputSet, ReactiveController};
pub use error::{DashboardError, DashboardResult};
