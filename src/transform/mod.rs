//! Declarative row filtering and per-category aggregation.
//!
//! Every operation returns a fresh [`Dataset`]; inputs are never mutated.
//! Zero matching rows is a normal outcome and yields an empty dataset that
//! keeps the input's column set.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{CellValue, Dataset};
use crate::error::{DashboardError, DashboardResult};

/// Category label that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Column produced by [`Reduction::Count`].
pub const COUNT_COLUMN: &str = "count";

/// Inclusive date range. `start > end` is valid and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start > self.end
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub field: String,
    pub label: String,
}

impl CategoryFilter {
    /// Returns `None` for the [`ALL_CATEGORIES`] sentinel.
    #[must_use]
    pub fn from_selection(field: &str, label: &str) -> Option<Self> {
        (label != ALL_CATEGORIES).then(|| Self {
            field: field.to_owned(),
            label: label.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Reduction {
    Sum { field: String },
    Count,
}

impl Reduction {
    #[must_use]
    pub fn output_column(&self) -> &str {
        match self {
            Self::Sum { field } => field,
            Self::Count => COUNT_COLUMN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrder {
    #[default]
    FirstSeen,
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub group_field: String,
    pub reduction: Reduction,
    #[serde(default)]
    pub order: GroupOrder,
}

impl Aggregation {
    #[must_use]
    pub fn sum(group_field: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            group_field: group_field.into(),
            reduction: Reduction::Sum {
                field: field.into(),
            },
            order: GroupOrder::FirstSeen,
        }
    }

    #[must_use]
    pub fn count(group_field: impl Into<String>) -> Self {
        Self {
            group_field: group_field.into(),
            reduction: Reduction::Count,
            order: GroupOrder::FirstSeen,
        }
    }

    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.order = GroupOrder::Sorted;
        self
    }
}

/// Complete filter pipeline for one derived table.
///
/// Stages run in a fixed order: date range, category, aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub date_field: String,
    pub range: Option<DateRange>,
    pub category: Option<CategoryFilter>,
    pub aggregation: Option<Aggregation>,
}

impl FilterSpec {
    #[must_use]
    pub fn new(date_field: impl Into<String>) -> Self {
        Self {
            date_field: date_field.into(),
            range: None,
            category: None,
            aggregation: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<CategoryFilter>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Option<Aggregation>) -> Self {
        self.aggregation = aggregation;
        self
    }
}

pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> DashboardResult<Dataset> {
    let mut current = match spec.range {
        Some(range) => filter_range(dataset, &spec.date_field, range)?,
        None => dataset.clone(),
    };
    if let Some(category) = &spec.category {
        current = filter_category(&current, category)?;
    }
    if let Some(aggregation) = &spec.aggregation {
        current = aggregate(&current, aggregation)?;
    }
    trace!(
        input_rows = dataset.len(),
        output_rows = current.len(),
        "applied filter spec"
    );
    Ok(current)
}

/// Keeps rows whose `field` holds a date inside `range`.
///
/// Rows whose cell is not a date never match.
pub fn filter_range(dataset: &Dataset, field: &str, range: DateRange) -> DashboardResult<Dataset> {
    let index = dataset.column_index(field)?;
    if range.is_empty() {
        return Ok(Dataset::empty(dataset.columns().to_vec()));
    }
    Ok(dataset.retain_rows(|row| {
        row.values()[index]
            .as_date()
            .is_some_and(|date| range.contains(date))
    }))
}

pub fn filter_category(dataset: &Dataset, filter: &CategoryFilter) -> DashboardResult<Dataset> {
    let index = dataset.column_index(&filter.field)?;
    Ok(dataset.retain_rows(|row| match &row.values()[index] {
        CellValue::Category(label) => *label == filter.label,
        other => other.to_string() == filter.label,
    }))
}

/// Collapses rows to one row per distinct group value.
///
/// Output columns are `[group_field, reduction column]`.
pub fn aggregate(dataset: &Dataset, aggregation: &Aggregation) -> DashboardResult<Dataset> {
    let group_index = dataset.column_index(&aggregation.group_field)?;
    let sum_index = match &aggregation.reduction {
        Reduction::Sum { field } => Some(dataset.column_index(field)?),
        Reduction::Count => None,
    };

    let mut groups: IndexMap<CellValue, f64> = IndexMap::new();
    for (row_index, row) in dataset.rows().enumerate() {
        let values = row.values();
        let contribution = match sum_index {
            Some(index) => values[index].as_f64().ok_or_else(|| {
                DashboardError::InvalidData(format!(
                    "cannot sum non-numeric value `{}` at row {row_index}",
                    values[index]
                ))
            })?,
            None => 1.0,
        };
        *groups.entry(values[group_index].clone()).or_insert(0.0) += contribution;
    }

    if aggregation.order == GroupOrder::Sorted {
        groups.sort_keys();
    }

    let columns = vec![
        aggregation.group_field.clone(),
        aggregation.reduction.output_column().to_owned(),
    ];
    let rows = groups
        .into_iter()
        .map(|(group, total)| vec![group, CellValue::number(total)])
        .collect();
    Ok(Dataset::from_validated_parts(columns, rows))
}
