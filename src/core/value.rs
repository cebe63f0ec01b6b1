use std::fmt;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Typed cell stored in a [`Dataset`](super::Dataset).
///
/// Serializes with its type as the key (`{"date":"2023-01-01"}`,
/// `{"number":12.5}`, `{"category":"League One"}`), so a date-shaped label
/// reads back as a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Date(NaiveDate),
    Number(OrderedFloat<f64>),
    Category(String),
}

impl CellValue {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn category(label: impl Into<String>) -> Self {
        Self::Category(label.into())
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value.into_inner()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Number(value) => write!(f, "{}", value.into_inner()),
            Self::Category(label) => f.write_str(label),
        }
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::category(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Category(value)
    }
}
