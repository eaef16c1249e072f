//! The catalog query engine.
//!
//! Owns one [`CatalogQuery`] and applies the listing controls to it. Filter
//! changes return to page 1; sort and view changes keep the page. Page
//! requests outside `[1, max_pages]` are clamped, never rejected.

use crate::config::{CatalogConfig, PageBound};
use crate::counter::{HeuristicCounter, ResultCounter};
use crate::error::{CatalogError, ConfigError};
use crate::query::{CatalogQuery, ViewMode};
use crate::url;
use furnmart_core::numeric::{self, Coerced};
use std::sync::Arc;

/// Outcome of a filter toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterToggled {
    /// `true` if the value is selected afterwards
    pub selected: bool,
    /// Result count after the toggle
    pub result_count: u32,
}

/// Catalog filter, sort, view and paging state
#[derive(Clone, Debug)]
pub struct CatalogQueryEngine {
    config: Arc<CatalogConfig>,
    counter: Arc<dyn ResultCounter>,
    query: CatalogQuery,
}

impl CatalogQueryEngine {
    /// Creates an engine at the default query, counting with the heuristic
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn new(config: Arc<CatalogConfig>) -> Result<Self, ConfigError> {
        let counter = Arc::new(HeuristicCounter::new(config.heuristic));
        Self::with_counter(config, counter)
    }

    /// Creates an engine with a custom result counter
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn with_counter(
        config: Arc<CatalogConfig>,
        counter: Arc<dyn ResultCounter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let query = CatalogQuery::initial(&config);
        Ok(Self {
            config,
            counter,
            query,
        })
    }

    /// Current query
    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Selects `value` in `group` if unselected, deselects it otherwise
    ///
    /// Returns to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownFilterGroup`] or
    /// [`CatalogError::UnknownFilterValue`] for input outside the taxonomy.
    pub fn toggle_filter(&mut self, group: &str, value: &str) -> Result<FilterToggled, CatalogError> {
        let Some(filter_group) = self.config.group(group) else {
            return Err(CatalogError::UnknownFilterGroup(group.to_string()));
        };
        if !filter_group.has_option(value) {
            return Err(CatalogError::UnknownFilterValue {
                group: group.to_string(),
                value: value.to_string(),
            });
        }

        let selected = self
            .query
            .filters
            .toggle(group, value)
            .ok_or_else(|| CatalogError::UnknownFilterGroup(group.to_string()))?;
        self.query.current_page = 1;

        let result_count = self.result_count();
        tracing::debug!(group, value, selected, result_count, "Filter toggled");
        Ok(FilterToggled {
            selected,
            result_count,
        })
    }

    /// Deselects everything and returns to page 1
    pub fn clear_all_filters(&mut self) {
        self.query.filters.clear();
        self.query.current_page = 1;
        tracing::debug!("All filters cleared");
    }

    /// Replaces the sort key; filters and page are kept
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSortKey`] if `key` is not configured.
    pub fn set_sort(&mut self, key: &str) -> Result<(), CatalogError> {
        if !self.config.has_sort_key(key) {
            return Err(CatalogError::UnknownSortKey(key.to_string()));
        }
        key.clone_into(&mut self.query.sort_by);
        tracing::debug!(sort = key, "Sort changed");
        Ok(())
    }

    /// Switches between grid and list
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.query.view_mode = mode;
        tracing::debug!(view = %mode, "View changed");
    }

    /// Moves to `page`, clamped into `[1, max_pages]`
    pub fn go_to_page(&mut self, page: i64) -> Coerced {
        self.apply_page(numeric::clamp(page, &(1..=self.max_pages())))
    }

    /// Moves to the page typed or clicked as text
    ///
    /// Non-numeric text goes to page 1.
    pub fn go_to_page_text(&mut self, text: &str) -> Coerced {
        self.apply_page(numeric::parse_clamped(text, &(1..=self.max_pages())))
    }

    /// The next-page control
    pub fn next_page(&mut self) -> Coerced {
        self.go_to_page(i64::from(self.query.current_page) + 1)
    }

    /// The previous-page control
    pub fn previous_page(&mut self) -> Coerced {
        self.go_to_page(i64::from(self.query.current_page) - 1)
    }

    fn apply_page(&mut self, page: Coerced) -> Coerced {
        self.query.current_page = page.value;
        if page.adjusted {
            tracing::debug!(page = page.value, "Page request clamped");
        } else {
            tracing::debug!(page = page.value, "Page changed");
        }
        page
    }

    /// Last valid page
    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.last_page_of(&self.query)
    }

    fn last_page_of(&self, query: &CatalogQuery) -> u32 {
        match self.config.page_bound {
            PageBound::Fixed(pages) => pages.max(1),
            PageBound::FromResults => self
                .counter
                .count(query)
                .div_ceil(self.config.items_per_page.max(1))
                .max(1),
        }
    }

    /// Number of products matching the current query
    #[must_use]
    pub fn result_count(&self) -> u32 {
        self.counter.count(&self.query)
    }

    /// Query string without the leading `?`; empty for the default query
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedQuery`] if encoding fails.
    pub fn serialize(&self) -> Result<String, CatalogError> {
        url::encode(&self.query, &self.config)
    }

    /// Search string for the address bar: `""` or `"?…"`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedQuery`] if encoding fails.
    pub fn location_search(&self) -> Result<String, CatalogError> {
        let encoded = self.serialize()?;
        if encoded.is_empty() {
            Ok(encoded)
        } else {
            Ok(format!("?{encoded}"))
        }
    }

    /// Decodes a query string against this engine's configuration
    ///
    /// Unknown groups, options and sort keys are dropped with a warning;
    /// the page is clamped to the last page of the decoded filters.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedQuery`] if `input` cannot be decoded.
    pub fn deserialize(&self, input: &str) -> Result<CatalogQuery, CatalogError> {
        let decoded = url::decode(input, &self.config)?;
        for rejected in &decoded.rejected {
            tracing::warn!(error = %rejected, "Dropped URL parameter");
        }

        let mut query = decoded.query;
        query.current_page = query.current_page.min(self.last_page_of(&query));
        Ok(query)
    }

    /// Replaces the current query with the one in `input`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedQuery`] if `input` cannot be decoded;
    /// the current query is then unchanged.
    pub fn load_query_string(&mut self, input: &str) -> Result<(), CatalogError> {
        self.query = self.deserialize(input)?;
        tracing::debug!(
            active_filters = self.query.filters.active_count(),
            page = self.query.current_page,
            "Query loaded from URL"
        );
        Ok(())
    }
}
