use std::io::Write;

use crate::api::OutputSet;
use crate::error::{DashboardError, DashboardResult};
use crate::render::Renderer;

/// Writes one JSON document per published output set.
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonLinesRenderer<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, outputs: &OutputSet) -> DashboardResult<()> {
        let payload = if self.pretty {
            outputs.to_json_contract_v1_pretty()?
        } else {
            outputs.to_json_contract_v1()?
        };
        writeln!(self.writer, "{payload}")
            .and_then(|()| self.writer.flush())
            .map_err(|e| DashboardError::InvalidData(format!("failed to write outputs: {e}")))
    }
}
