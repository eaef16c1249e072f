//! Catalog configuration: filter taxonomy, sort keys and paging.
//!
//! Supplied at construction and validated once; the engine never hard-codes
//! group names or option values.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// URL parameters owned by the engine, unavailable as group names
pub const RESERVED_PARAMS: [&str; 3] = ["sort", "page", "view"];

/// A named facet and its selectable options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Group name, also the URL parameter name
    pub name: String,
    /// Option values, in display order
    pub options: Vec<String>,
}

impl FilterGroup {
    /// Creates a group from borrowed names
    #[must_use]
    pub fn new(name: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
        }
    }

    /// `true` if `value` is one of the group's options
    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }
}

/// How the last page number is determined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBound {
    /// A fixed page count, independent of the result count
    Fixed(u32),
    /// `ceil(result_count / items_per_page)`, at least 1
    FromResults,
}

/// Parameters of the placeholder result-count heuristic
///
/// `count = max(floor, base - step × active_filters)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicParams {
    /// Count with no filters active
    pub base: u32,
    /// Reduction per active filter value
    pub step: u32,
    /// Lower bound
    pub floor: u32,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            base: 165,
            step: 15,
            floor: 10,
        }
    }
}

/// Complete catalog configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Filter groups in URL order
    pub filter_groups: Vec<FilterGroup>,
    /// Allowed sort keys
    pub sort_keys: Vec<String>,
    /// Sort applied when none is chosen; omitted from the URL
    pub default_sort: String,
    /// Products per page
    pub items_per_page: u32,
    /// Last-page rule
    pub page_bound: PageBound,
    /// Result-count heuristic
    pub heuristic: HeuristicParams,
}

impl CatalogConfig {
    /// The storefront's catalog taxonomy
    #[must_use]
    pub fn furnmart() -> Self {
        Self {
            filter_groups: vec![
                FilterGroup::new(
                    "category",
                    &["sofas", "chairs", "tables", "beds", "storage", "decor"],
                ),
                FilterGroup::new(
                    "price",
                    &["under-1000", "1000-5000", "5000-10000", "over-10000"],
                ),
                FilterGroup::new(
                    "room",
                    &["living-room", "bedroom", "dining-room", "office", "outdoor"],
                ),
                FilterGroup::new(
                    "features",
                    &["on-sale", "new-arrival", "free-delivery", "eco-friendly"],
                ),
            ],
            sort_keys: ["featured", "price-low", "price-high", "newest", "rating", "name"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            default_sort: "featured".to_string(),
            items_per_page: 12,
            page_bound: PageBound::Fixed(12),
            heuristic: HeuristicParams::default(),
        }
    }

    /// Checks the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter_groups.is_empty() {
            return Err(ConfigError::NoFilterGroups);
        }

        let mut names = HashSet::new();
        for group in &self.filter_groups {
            Self::validate_group(group)?;
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::DuplicateGroup(group.name.clone()));
            }
        }

        if self.sort_keys.is_empty() {
            return Err(ConfigError::NoSortKeys);
        }
        if !self.has_sort_key(&self.default_sort) {
            return Err(ConfigError::UnknownDefaultSort(self.default_sort.clone()));
        }
        if self.items_per_page == 0 {
            return Err(ConfigError::ZeroItemsPerPage);
        }
        if self.page_bound == PageBound::Fixed(0) {
            return Err(ConfigError::ZeroPageBound);
        }
        Ok(())
    }

    fn validate_group(group: &FilterGroup) -> Result<(), ConfigError> {
        if group.name.trim().is_empty() {
            return Err(ConfigError::EmptyGroupName);
        }
        if RESERVED_PARAMS.contains(&group.name.as_str()) {
            return Err(ConfigError::ReservedGroupName(group.name.clone()));
        }
        if group.options.is_empty() {
            return Err(ConfigError::EmptyGroup(group.name.clone()));
        }

        let mut seen = HashSet::new();
        for value in &group.options {
            // Values are comma-joined in the URL
            if value.is_empty() || value.contains(',') {
                return Err(ConfigError::InvalidOption {
                    group: group.name.clone(),
                    value: value.clone(),
                });
            }
            if !seen.insert(value.as_str()) {
                return Err(ConfigError::DuplicateOption {
                    group: group.name.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Looks up a filter group by name
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&FilterGroup> {
        self.filter_groups.iter().find(|group| group.name == name)
    }

    /// `true` if `key` is a configured sort key
    #[must_use]
    pub fn has_sort_key(&self, key: &str) -> bool {
        self.sort_keys.iter().any(|k| k == key)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::furnmart()
    }
}
