use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chart::{ChartSpecBuilder, DEFAULT_HISTOGRAM_BUCKETS};
use crate::core::DatasetFields;
use crate::data::{
    DataProvider, GeneratedProvider, GeneratedSourceConfig, MemoizedProvider, StaticProvider,
};
use crate::error::{DashboardError, DashboardResult};

use super::{DashboardLayout, InputState, ReactiveController, SlotDefinition};

/// Where datasets come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceConfig {
    Generated(GeneratedSourceConfig),
    Static { files: IndexMap<String, PathBuf> },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Generated(GeneratedSourceConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreset {
    #[default]
    Overview,
    SingleChart,
    Custom(Vec<SlotDefinition>),
}

/// Public dashboard bootstrap configuration.
///
/// Every field has a default, so `{}` is a valid config describing the
/// generated-data overview dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub fields: DatasetFields,
    #[serde(default)]
    pub defaults: InputState,
    #[serde(default = "default_histogram_buckets")]
    pub histogram_buckets: u16,
    #[serde(default)]
    pub layout: LayoutPreset,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            fields: DatasetFields::default(),
            defaults: InputState::default(),
            histogram_buckets: default_histogram_buckets(),
            layout: LayoutPreset::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> DashboardResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| DashboardError::InvalidConfig(format!("failed to parse config: {e}")))
    }

    /// Reads a JSON config file. Relative static file paths resolve against
    /// the config file's directory.
    pub fn from_path(path: &Path) -> DashboardResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            DashboardError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_json_str(&raw)?;
        if let (SourceConfig::Static { files }, Some(base)) = (&mut config.source, path.parent())
        {
            for file in files.values_mut() {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    pub fn validate(&self) -> DashboardResult<()> {
        self.builder()?;
        self.layout()?;
        self.provider()?;
        Ok(())
    }

    pub fn builder(&self) -> DashboardResult<ChartSpecBuilder> {
        ChartSpecBuilder::new(self.histogram_buckets)
    }

    pub fn layout(&self) -> DashboardResult<DashboardLayout> {
        match &self.layout {
            LayoutPreset::Overview => Ok(DashboardLayout::overview(&self.fields)),
            LayoutPreset::SingleChart => Ok(DashboardLayout::single_chart(&self.fields)),
            LayoutPreset::Custom(slots) => DashboardLayout::new(slots.clone()),
        }
    }

    /// Builds the configured provider behind a single-entry memo.
    pub fn provider(&self) -> DashboardResult<Box<dyn DataProvider>> {
        match &self.source {
            SourceConfig::Generated(generated) => Ok(Box::new(MemoizedProvider::new(
                GeneratedProvider::new(generated.clone(), self.fields.clone())?,
            ))),
            SourceConfig::Static { files } => Ok(Box::new(MemoizedProvider::new(
                StaticProvider::new(files.clone(), self.fields.clone())?,
            ))),
        }
    }

    /// Validates the config, checks the data source and runs the initial
    /// recompute.
    ///
    /// In static mode the default dataset must load; failure here is the one
    /// fatal `DataUnavailable`.
    pub fn start(&self) -> DashboardResult<ReactiveController<Box<dyn DataProvider>>> {
        let builder = self.builder()?;
        let layout = self.layout()?;
        let mut provider = self.provider()?;

        if matches!(self.source, SourceConfig::Static { .. }) {
            let dataset = provider.fetch(self.defaults.dataset_key())?;
            info!(
                key = self.defaults.dataset_key(),
                rows = dataset.len(),
                "static data source reachable"
            );
        }

        Ok(ReactiveController::new(
            provider,
            layout,
            self.fields.clone(),
            builder,
            self.defaults.clone(),
        ))
    }
}

fn default_histogram_buckets() -> u16 {
    DEFAULT_HISTOGRAM_BUCKETS
}
