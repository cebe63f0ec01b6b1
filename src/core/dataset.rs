use serde::Serialize;

use crate::core::CellValue;
use crate::error::{DashboardError, DashboardResult};

/// Immutable in-memory table: ordered rows over a fixed column set.
///
/// Every row carries exactly one value per column; this is checked once at
/// construction so consumers can index rows without re-validating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Borrowed view of one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [CellValue],
}

impl<'a> RowRef<'a> {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let values: &'a [CellValue] = self.values;
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| values.get(index))
    }

    #[must_use]
    pub fn values(&self) -> &'a [CellValue] {
        self.values
    }
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> DashboardResult<Self> {
        for (index, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DashboardError::InvalidData(
                    "column names must be non-empty".to_owned(),
                ));
            }
            if columns[..index].contains(name) {
                return Err(DashboardError::InvalidData(format!(
                    "duplicate column name `{name}`"
                )));
            }
        }

        if let Some((row_index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DashboardError::InvalidData(format!(
                "row {row_index} has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Skips validation; callers guarantee every row matches `columns`.
    pub(crate) fn from_validated_parts(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    #[must_use]
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    pub fn column_index(&self, column: &str) -> DashboardResult<usize> {
        self.columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| DashboardError::MissingField(column.to_owned()))
    }

    pub fn require_columns<'c>(
        &self,
        columns: impl IntoIterator<Item = &'c str>,
    ) -> DashboardResult<()> {
        for column in columns {
            self.column_index(column)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = RowRef<'_>> + '_ {
        self.rows.iter().map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Iterates one column top to bottom.
    pub fn column<'a>(
        &'a self,
        column: &str,
    ) -> DashboardResult<impl ExactSizeIterator<Item = &'a CellValue> + use<'a>> {
        let index = self.column_index(column)?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    /// Collects a column that must hold numbers only.
    pub fn numeric_column(&self, column: &str) -> DashboardResult<Vec<f64>> {
        self.column(column)?
            .enumerate()
            .map(|(row_index, value)| {
                value.as_f64().ok_or_else(|| {
                    DashboardError::InvalidData(format!(
                        "column `{column}` row {row_index} is not numeric: {value}"
                    ))
                })
            })
            .collect()
    }

    /// Returns a new dataset holding the rows that satisfy `keep`, in order.
    #[must_use]
    pub fn retain_rows(&self, mut keep: impl FnMut(RowRef<'_>) -> bool) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|values| {
                keep(RowRef {
                    columns: &self.columns,
                    values,
                })
            })
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
