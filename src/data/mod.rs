//! Dataset providers.
//!
//! A provider turns a dataset key into an immutable [`Dataset`]. Providers
//! never filter: whatever the source holds is returned as-is and narrowed later
//! by [`crate::transform`].

mod generated;
mod memo;
mod static_source;

use std::sync::Arc;

pub use generated::{GeneratedProvider, GeneratedSourceConfig, seed_for_key};
pub use memo::{MemoStats, MemoizedProvider};
pub use static_source::{StaticProvider, parse_csv};

use crate::core::Dataset;
use crate::error::DashboardResult;

/// Source of datasets keyed by the `dataset_key` input.
pub trait DataProvider {
    fn fetch(&mut self, key: &str) -> DashboardResult<Arc<Dataset>>;
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn fetch(&mut self, key: &str) -> DashboardResult<Arc<Dataset>> {
        (**self).fetch(key)
    }
}
