use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

use super::OutputSet;

pub const OUTPUT_SET_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSetJsonContractV1 {
    pub schema_version: u32,
    pub outputs: OutputSet,
}

impl OutputSet {
    pub fn to_json_contract_v1(&self) -> DashboardResult<String> {
        serde_json::to_string(&self.contract_v1()).map_err(|e| {
            DashboardError::InvalidData(format!("failed to serialize output contract v1: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(&self.contract_v1()).map_err(|e| {
            DashboardError::InvalidData(format!("failed to serialize output contract v1: {e}"))
        })
    }

    /// Accepts both a bare output set and a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> DashboardResult<Self> {
        if let Ok(payload) = serde_json::from_str::<OutputSetJsonContractV1>(input) {
            if payload.schema_version != OUTPUT_SET_JSON_SCHEMA_V1 {
                return Err(DashboardError::InvalidData(format!(
                    "unsupported output set schema version: {}",
                    payload.schema_version
                )));
            }
            return Ok(payload.outputs);
        }
        serde_json::from_str::<OutputSet>(input).map_err(|e| {
            DashboardError::InvalidData(format!("failed to parse output set json payload: {e}"))
        })
    }

    fn contract_v1(&self) -> OutputSetJsonContractV1 {
        OutputSetJsonContractV1 {
            schema_version: OUTPUT_SET_JSON_SCHEMA_V1,
            outputs: self.clone(),
        }
    }
}
