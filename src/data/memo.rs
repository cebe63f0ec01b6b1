use std::sync::Arc;

use tracing::trace;

use crate::core::Dataset;
use crate::error::DashboardResult;

use super::DataProvider;

/// Runtime metrics of the most-recent-result memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Remembers the last successfully fetched dataset.
///
/// Only a single entry is kept. Failures are never memoized, so a source that
/// comes back is picked up on the next fetch.
#[derive(Debug)]
pub struct MemoizedProvider<P> {
    inner: P,
    last: Option<(String, Arc<Dataset>)>,
    stats: MemoStats,
}

impl<P: DataProvider> MemoizedProvider<P> {
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last: None,
            stats: MemoStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl<P: DataProvider> DataProvider for MemoizedProvider<P> {
    fn fetch(&mut self, key: &str) -> DashboardResult<Arc<Dataset>> {
        if let Some((last_key, dataset)) = &self.last {
            if last_key == key {
                self.stats.hits += 1;
                trace!(key, "dataset memo hit");
                return Ok(Arc::clone(dataset));
            }
        }

        self.stats.misses += 1;
        let dataset = self.inner.fetch(key)?;
        self.last = Some((key.to_owned(), Arc::clone(&dataset)));
        Ok(dataset)
    }
}
