use crate::api::{OutputSet, SlotOutput};
use crate::chart::ChartData;
use crate::error::{DashboardError, DashboardResult};
use crate::render::Renderer;

/// No-op renderer used by tests and headless runs.
///
/// It still validates specs so tests catch payloads a real plotting backend
/// would reject.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: usize,
    pub last_chart_count: usize,
    pub last_error_count: usize,
    pub last_point_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, outputs: &OutputSet) -> DashboardResult<()> {
        let mut charts = 0;
        let mut errors = 0;
        let mut points = 0;
        for (slot, output) in outputs.iter() {
            let SlotOutput::Chart(spec) = output else {
                continue;
            };
            charts += 1;
            if spec.is_error() {
                errors += 1;
                continue;
            }
            let finite = match &spec.data {
                ChartData::Points { points } => points.iter().all(|point| point.y.is_finite()),
                ChartData::Histogram {
                    values,
                    bucket_count,
                } => *bucket_count > 0 && values.iter().all(|value| value.is_finite()),
                ChartData::Groups { groups } => groups
                    .iter()
                    .all(|group| group.values.iter().all(|value| value.is_finite())),
                ChartData::Slices { .. } => true,
                ChartData::Error { .. } => false,
            };
            if !finite {
                return Err(DashboardError::InvalidData(format!(
                    "slot `{slot}` carries a non-renderable payload"
                )));
            }
            points += spec.point_count();
        }

        self.frames += 1;
        self.last_chart_count = charts;
        self.last_error_count = errors;
        self.last_point_count = points;
        Ok(())
    }
}
