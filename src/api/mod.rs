//! Reactive dashboard API: inputs, slot layout, published outputs and the
//! controller tying them together.

mod config;
mod controller;
mod inputs;
mod json_contract;
mod layout;
mod output_set;

pub use config::{DashboardConfig, LayoutPreset, SourceConfig};
pub use controller::{CycleState, ReactiveController};
pub use inputs::{FilterScope, InputEvent, InputName, InputSet, InputState};
pub use json_contract::{OUTPUT_SET_JSON_SCHEMA_V1, OutputSetJsonContractV1};
pub use layout::{
    ChartSlot, DashboardLayout, KindSource, SlotContent, SlotDefinition, SlotId, StatusSlot,
};
pub use output_set::{OutputSet, SlotOutput};
