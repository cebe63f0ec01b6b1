mod json_lines;
mod null_renderer;

pub use json_lines::JsonLinesRenderer;
pub use null_renderer::NullRenderer;

use crate::api::OutputSet;
use crate::error::DashboardResult;

/// Contract implemented by any host-side output backend.
///
/// Backends receive a complete, self-contained `OutputSet` per recompute
/// cycle, so drawing code stays isolated from inputs and data loading.
pub trait Renderer {
    fn render(&mut self, outputs: &OutputSet) -> DashboardResult<()>;
}
