//! Renderer-agnostic chart descriptions.
//!
//! A [`ChartSpec`] is a self-contained value: it owns the rows it plots, so
//! hosts can hand specs to a plotting backend in any order or in parallel.

mod builder;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CellValue;
use crate::error::DashboardError;

pub use builder::{ChartSpecBuilder, DEFAULT_HISTOGRAM_BUCKETS, build};

/// Chart kinds a user or layout may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Pie,
    Histogram,
    Box,
}

impl ChartKind {
    pub const ALL: [Self; 6] = [
        Self::Line,
        Self::Bar,
        Self::Scatter,
        Self::Pie,
        Self::Histogram,
        Self::Box,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Histogram => "histogram",
            Self::Box => "box",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    /// Kind names are matched exactly: `"LINE"` and `" pie "` are unsupported.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| DashboardError::UnsupportedChartKind(value.to_owned()))
    }
}

/// Kind tag carried by a published spec; `Error` marks a failed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSpecKind {
    Line,
    Bar,
    Scatter,
    Pie,
    Histogram,
    Box,
    Error,
}

impl From<ChartKind> for ChartSpecKind {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Line => Self::Line,
            ChartKind::Bar => Self::Bar,
            ChartKind::Scatter => Self::Scatter,
            ChartKind::Pie => Self::Pie,
            ChartKind::Histogram => Self::Histogram,
            ChartKind::Box => Self::Box,
        }
    }
}

/// Which dataset columns a chart reads.
///
/// `line`, `bar` and `scatter` use `x`, `y` and the optional `color`; `pie`
/// counts rows per `x`; `histogram` reads `y`; `box` groups `y` by `x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl FieldMapping {
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: CellValue,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: CellValue,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub label: CellValue,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Points { points: Vec<SeriesPoint> },
    Slices { slices: Vec<PieSlice> },
    Histogram { values: Vec<f64>, bucket_count: u16 },
    Groups { groups: Vec<BoxGroup> },
    Error { message: String },
}

/// Declarative description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartSpecKind,
    pub title: String,
    #[serde(default)]
    pub x_field: Option<String>,
    #[serde(default)]
    pub y_field: Option<String>,
    #[serde(default)]
    pub color_field: Option<String>,
    pub data: ChartData,
}

impl ChartSpec {
    /// Placeholder published in place of a slot whose recompute failed.
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ChartSpecKind::Error,
            title: title.into(),
            x_field: None,
            y_field: None,
            color_field: None,
            data: ChartData::Error {
                message: message.into(),
            },
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == ChartSpecKind::Error
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.data {
            ChartData::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Number of plotted data points (raw samples for histogram and box).
    #[must_use]
    pub fn point_count(&self) -> usize {
        match &self.data {
            ChartData::Points { points } => points.len(),
            ChartData::Slices { slices } => slices.len(),
            ChartData::Histogram { values, .. } => values.len(),
            ChartData::Groups { groups } => groups.iter().map(|group| group.values.len()).sum(),
            ChartData::Error { .. } => 0,
        }
    }

    /// Number of distinct groups: slices, boxes, or point series.
    #[must_use]
    pub fn group_count(&self) -> usize {
        match &self.data {
            ChartData::Slices { slices } => slices.len(),
            ChartData::Groups { groups } => groups.len(),
            ChartData::Points { points } => {
                let mut seen: Vec<Option<&CellValue>> = Vec::new();
                for point in points {
                    let group = point.group.as_ref();
                    if !seen.contains(&group) {
                        seen.push(group);
                    }
                }
                seen.len()
            }
            ChartData::Histogram { .. } | ChartData::Error { .. } => 0,
        }
    }
}
