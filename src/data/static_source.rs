use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::core::{CellValue, Dataset, DatasetFields};
use crate::error::{DashboardError, DashboardResult};

use super::DataProvider;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// File-backed provider: each dataset key names one CSV file.
///
/// Files are re-read on every fetch, so a file that disappears mid-session
/// surfaces as `DataUnavailable` for the slots that need it.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    sources: IndexMap<String, PathBuf>,
    fields: DatasetFields,
}

impl StaticProvider {
    pub fn new(sources: IndexMap<String, PathBuf>, fields: DatasetFields) -> DashboardResult<Self> {
        if sources.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "static source needs at least one dataset file".to_owned(),
            ));
        }
        Ok(Self { sources, fields })
    }

    #[must_use]
    pub fn single(key: impl Into<String>, path: impl Into<PathBuf>, fields: DatasetFields) -> Self {
        let mut sources = IndexMap::new();
        sources.insert(key.into(), path.into());
        Self { sources, fields }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.keys().map(String::as_str)
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> Option<&Path> {
        self.sources.get(key).map(PathBuf::as_path)
    }
}

impl DataProvider for StaticProvider {
    fn fetch(&mut self, key: &str) -> DashboardResult<Arc<Dataset>> {
        let path = self
            .path_for(key)
            .ok_or_else(|| DashboardError::data_unavailable(key, "unknown dataset key"))?;
        let file = File::open(path).map_err(|err| {
            DashboardError::data_unavailable(key, format!("cannot open {}: {err}", path.display()))
        })?;
        let dataset = parse_csv(key, file, &self.fields)?;
        debug!(key, path = %path.display(), rows = dataset.len(), "loaded static dataset");
        Ok(Arc::new(dataset))
    }
}

/// Parses a headed CSV table into a typed dataset.
///
/// The configured date column must hold `YYYY-MM-DD` dates and the value
/// column finite numbers; every other column is kept as category labels.
pub fn parse_csv<R: Read>(key: &str, input: R, fields: &DatasetFields) -> DashboardResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|err| DashboardError::data_unavailable(key, format!("unreadable header: {err}")))?
        .iter()
        .map(str::to_owned)
        .collect();

    let position = |name: &str| {
        columns.iter().position(|column| column == name).ok_or_else(|| {
            DashboardError::data_unavailable(key, format!("missing required column `{name}`"))
        })
    };
    let date_index = position(&fields.date)?;
    let value_index = position(&fields.value)?;
    position(&fields.category)?;

    let mut rows = Vec::new();
    for (record_index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            DashboardError::data_unavailable(key, format!("record {record_index}: {err}"))
        })?;
        let mut row = Vec::with_capacity(columns.len());
        for (index, raw) in record.iter().enumerate() {
            let cell = if index == date_index {
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map(CellValue::Date)
                    .map_err(|err| {
                        DashboardError::data_unavailable(
                            key,
                            format!("record {record_index}: bad date `{raw}`: {err}"),
                        )
                    })?
            } else if index == value_index {
                match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => CellValue::number(value),
                    _ => {
                        return Err(DashboardError::data_unavailable(
                            key,
                            format!("record {record_index}: bad number `{raw}`"),
                        ));
                    }
                }
            } else {
                CellValue::category(raw)
            };
            row.push(cell);
        }
        rows.push(row);
    }

    Dataset::new(columns, rows).map_err(|err| DashboardError::data_unavailable(key, err.to_string()))
}
