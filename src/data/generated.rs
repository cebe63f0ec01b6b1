use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::core::{CellValue, Dataset, DatasetFields};
use crate::error::{DashboardError, DashboardResult};

use super::DataProvider;

/// Shape of synthesized sample data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSourceConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_base_value")]
    pub base_value: f64,
    /// Largest absolute day-to-day change of the random walk.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

impl Default for GeneratedSourceConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            days: default_days(),
            categories: default_categories(),
            base_value: default_base_value(),
            volatility: default_volatility(),
        }
    }
}

/// Deterministic sample-data provider.
///
/// The same key always produces the same rows: the RNG seed is derived from
/// the key bytes, never from time or process state.
#[derive(Debug, Clone)]
pub struct GeneratedProvider {
    config: GeneratedSourceConfig,
    fields: DatasetFields,
}

impl GeneratedProvider {
    pub fn new(config: GeneratedSourceConfig, fields: DatasetFields) -> DashboardResult<Self> {
        if config.days == 0 {
            return Err(DashboardError::InvalidConfig(
                "generated source must produce at least one day".to_owned(),
            ));
        }
        if config.categories.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "generated source needs at least one category".to_owned(),
            ));
        }
        if !config.base_value.is_finite() || !config.volatility.is_finite() {
            return Err(DashboardError::InvalidConfig(
                "generated base value and volatility must be finite".to_owned(),
            ));
        }
        if config.volatility < 0.0 {
            return Err(DashboardError::InvalidConfig(
                "generated volatility must be >= 0".to_owned(),
            ));
        }
        if config
            .start_date
            .checked_add_days(Days::new(u64::from(config.days)))
            .is_none()
        {
            return Err(DashboardError::InvalidConfig(
                "generated date range overflows the calendar".to_owned(),
            ));
        }
        Ok(Self { config, fields })
    }

    #[must_use]
    pub fn config(&self) -> &GeneratedSourceConfig {
        &self.config
    }

    /// Builds the dataset for `key`: one row per day, categories in rotation,
    /// values following a seeded non-negative random walk.
    #[must_use]
    pub fn generate(&self, key: &str) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed_for_key(key));
        let columns = vec![
            self.fields.date.clone(),
            self.fields.value.clone(),
            self.fields.category.clone(),
        ];

        let mut value = self.config.base_value;
        let mut rows = Vec::with_capacity(self.config.days as usize);
        for (offset, date) in self
            .config
            .start_date
            .iter_days()
            .take(self.config.days as usize)
            .enumerate()
        {
            if self.config.volatility > 0.0 {
                value += rng.gen_range(-self.config.volatility..=self.config.volatility);
            }
            value = (value.max(0.0) * 100.0).round() / 100.0;
            let category = &self.config.categories[offset % self.config.categories.len()];
            rows.push(vec![
                CellValue::Date(date),
                CellValue::number(value),
                CellValue::category(category.as_str()),
            ]);
        }

        Dataset::from_validated_parts(columns, rows)
    }
}

impl DataProvider for GeneratedProvider {
    fn fetch(&mut self, key: &str) -> DashboardResult<Arc<Dataset>> {
        let dataset = self.generate(key);
        trace!(key, rows = dataset.len(), "generated dataset");
        Ok(Arc::new(dataset))
    }
}

/// Derives a stable RNG seed from a dataset key.
#[must_use]
pub fn seed_for_key(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_days() -> u32 {
    365
}

fn default_categories() -> Vec<String> {
    vec!["League One".to_owned(), "League Two".to_owned()]
}

fn default_base_value() -> f64 {
    8_000.0
}

fn default_volatility() -> f64 {
    250.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_depends_on_key_only() {
        assert_eq!(seed_for_key("data1"), seed_for_key("data1"));
        assert_ne!(seed_for_key("data1"), seed_for_key("data2"));
    }

    #[test]
    fn zero_volatility_keeps_base_value() {
        let config = GeneratedSourceConfig {
            days: 3,
            volatility: 0.0,
            base_value: 12.5,
            ..GeneratedSourceConfig::default()
        };
        let provider =
            GeneratedProvider::new(config, DatasetFields::default()).expect("valid config");
        let dataset = provider.generate("flat");
        let values = dataset.numeric_column("value").expect("numeric values");
        assert_eq!(values, vec![12.5, 12.5, 12.5]);
    }
}
