use indexmap::IndexMap;

use crate::core::{CellValue, Dataset};
use crate::error::{DashboardError, DashboardResult};
use crate::transform::{Aggregation, COUNT_COLUMN, aggregate};

use super::{BoxGroup, ChartData, ChartKind, ChartSpec, FieldMapping, PieSlice, SeriesPoint};

pub const DEFAULT_HISTOGRAM_BUCKETS: u16 = 20;

/// Builds chart specs from derived tables.
///
/// Pure: output depends only on the arguments and the bucket setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpecBuilder {
    histogram_buckets: u16,
}

impl Default for ChartSpecBuilder {
    fn default() -> Self {
        Self {
            histogram_buckets: DEFAULT_HISTOGRAM_BUCKETS,
        }
    }
}

/// Builds with the default bucket count, parsing `chart_kind` first.
pub fn build(
    dataset: &Dataset,
    chart_kind: &str,
    mapping: &FieldMapping,
    title: &str,
) -> DashboardResult<ChartSpec> {
    ChartSpecBuilder::default().build(dataset, chart_kind, mapping, title)
}

impl ChartSpecBuilder {
    pub fn new(histogram_buckets: u16) -> DashboardResult<Self> {
        if histogram_buckets == 0 {
            return Err(DashboardError::InvalidConfig(
                "histogram bucket count must be > 0".to_owned(),
            ));
        }
        Ok(Self { histogram_buckets })
    }

    #[must_use]
    pub fn histogram_buckets(self) -> u16 {
        self.histogram_buckets
    }

    pub fn build(
        self,
        dataset: &Dataset,
        chart_kind: &str,
        mapping: &FieldMapping,
        title: &str,
    ) -> DashboardResult<ChartSpec> {
        let kind: ChartKind = chart_kind.parse()?;
        self.build_kind(dataset, kind, mapping, title)
    }

    pub fn build_kind(
        self,
        dataset: &Dataset,
        kind: ChartKind,
        mapping: &FieldMapping,
        title: &str,
    ) -> DashboardResult<ChartSpec> {
        let mut spec = ChartSpec {
            kind: kind.into(),
            title: title.to_owned(),
            x_field: None,
            y_field: None,
            color_field: None,
            data: ChartData::Points { points: Vec::new() },
        };

        match kind {
            ChartKind::Line | ChartKind::Bar | ChartKind::Scatter => {
                spec.data = ChartData::Points {
                    points: series_points(dataset, mapping)?,
                };
                spec.x_field = Some(mapping.x.clone());
                spec.y_field = Some(mapping.y.clone());
                spec.color_field = mapping.color.clone();
            }
            ChartKind::Pie => {
                let counts = aggregate(dataset, &Aggregation::count(mapping.x.as_str()))?;
                let slices = counts
                    .rows()
                    .map(|row| {
                        let values = row.values();
                        PieSlice {
                            label: values[0].clone(),
                            count: values[1].as_f64().unwrap_or(0.0) as u64,
                        }
                    })
                    .collect();
                spec.data = ChartData::Slices { slices };
                spec.x_field = Some(mapping.x.clone());
                spec.y_field = Some(COUNT_COLUMN.to_owned());
            }
            ChartKind::Histogram => {
                spec.data = ChartData::Histogram {
                    values: dataset.numeric_column(&mapping.y)?,
                    bucket_count: self.histogram_buckets,
                };
                spec.y_field = Some(mapping.y.clone());
            }
            ChartKind::Box => {
                spec.data = ChartData::Groups {
                    groups: box_groups(dataset, mapping)?,
                };
                spec.x_field = Some(mapping.x.clone());
                spec.y_field = Some(mapping.y.clone());
            }
        }

        Ok(spec)
    }
}

fn series_points(dataset: &Dataset, mapping: &FieldMapping) -> DashboardResult<Vec<SeriesPoint>> {
    let x_index = dataset.column_index(&mapping.x)?;
    let y_index = dataset.column_index(&mapping.y)?;
    let color_index = mapping
        .color
        .as_deref()
        .map(|color| dataset.column_index(color))
        .transpose()?;

    dataset
        .rows()
        .enumerate()
        .map(|(row_index, row)| {
            let values = row.values();
            Ok(SeriesPoint {
                x: values[x_index].clone(),
                y: numeric(&values[y_index], &mapping.y, row_index)?,
                group: color_index.map(|index| values[index].clone()),
            })
        })
        .collect()
}

fn box_groups(dataset: &Dataset, mapping: &FieldMapping) -> DashboardResult<Vec<BoxGroup>> {
    let x_index = dataset.column_index(&mapping.x)?;
    let y_index = dataset.column_index(&mapping.y)?;

    let mut groups: IndexMap<CellValue, Vec<f64>> = IndexMap::new();
    for (row_index, row) in dataset.rows().enumerate() {
        let values = row.values();
        let value = numeric(&values[y_index], &mapping.y, row_index)?;
        groups
            .entry(values[x_index].clone())
            .or_default()
            .push(value);
    }

    Ok(groups
        .into_iter()
        .map(|(label, values)| BoxGroup { label, values })
        .collect())
}

fn numeric(value: &CellValue, field: &str, row_index: usize) -> DashboardResult<f64> {
    value.as_f64().ok_or_else(|| {
        DashboardError::InvalidData(format!(
            "field `{field}` row {row_index} is not numeric: {value}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buckets_is_rejected() {
        assert!(matches!(
            ChartSpecBuilder::new(0),
            Err(DashboardError::InvalidConfig(_))
        ));
        assert_eq!(
            ChartSpecBuilder::new(7).expect("valid").histogram_buckets(),
            7
        );
    }
}
