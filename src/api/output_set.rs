use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::error::{DashboardError, DashboardResult};

use super::SlotId;

/// Current content of one output slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SlotOutput {
    Chart(ChartSpec),
    Status(String),
}

impl SlotOutput {
    #[must_use]
    pub fn as_chart(&self) -> Option<&ChartSpec> {
        match self {
            Self::Chart(spec) => Some(spec),
            Self::Status(_) => None,
        }
    }

    #[must_use]
    pub fn as_status(&self) -> Option<&str> {
        match self {
            Self::Status(text) => Some(text),
            Self::Chart(_) => None,
        }
    }
}

/// Snapshot of every published slot, in layout order.
///
/// The controller builds a fresh set per recompute cycle and swaps it in
/// whole; hosts only ever observe complete snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSet {
    slots: IndexMap<SlotId, SlotOutput>,
}

impl OutputSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&SlotOutput> {
        self.slots.get(slot)
    }

    #[must_use]
    pub fn chart(&self, slot: &str) -> Option<&ChartSpec> {
        self.get(slot).and_then(SlotOutput::as_chart)
    }

    #[must_use]
    pub fn status(&self, slot: &str) -> Option<&str> {
        self.get(slot).and_then(SlotOutput::as_status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &SlotOutput)> + '_ {
        self.slots.iter()
    }

    pub fn slot_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.keys().map(SlotId::as_str)
    }

    /// Slots currently holding an error placeholder.
    pub fn error_slots(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .filter(|(_, output)| output.as_chart().is_some_and(ChartSpec::is_error))
            .map(|(id, _)| id.as_str())
    }

    pub(crate) fn insert(&mut self, slot: SlotId, output: SlotOutput) {
        self.slots.insert(slot, output);
    }

    pub fn to_json(&self) -> DashboardResult<String> {
        serde_json::to_string(self).map_err(|e| {
            DashboardError::InvalidData(format!("failed to serialize output set: {e}"))
        })
    }
}
