//! Result counting seam.
//!
//! The storefront has no search backend yet, so the count is a heuristic of
//! the number of active filters. A real backend implements [`ResultCounter`]
//! and is handed to the engine without changing its public shape.

use crate::config::HeuristicParams;
use crate::query::CatalogQuery;
use std::fmt;

/// Counts the products matching a query
pub trait ResultCounter: Send + Sync + fmt::Debug {
    /// Number of products matching `query`
    fn count(&self, query: &CatalogQuery) -> u32;
}

/// `max(floor, base - step × active_filters)`
///
/// Non-increasing in the number of active filters and never below `floor`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeuristicCounter {
    params: HeuristicParams,
}

impl HeuristicCounter {
    /// Creates a counter with the given parameters
    #[must_use]
    pub const fn new(params: HeuristicParams) -> Self {
        Self { params }
    }
}

impl ResultCounter for HeuristicCounter {
    fn count(&self, query: &CatalogQuery) -> u32 {
        let active = u32::try_from(query.filters.active_count()).unwrap_or(u32::MAX);
        self.params
            .base
            .saturating_sub(self.params.step.saturating_mul(active))
            .max(self.params.floor)
    }
}
