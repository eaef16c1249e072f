//! Catalog query value types.

use crate::config::CatalogConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Product grid layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Card grid
    #[default]
    Grid,
    /// One product per row
    List,
}

impl ViewMode {
    /// URL form of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    /// Parses the URL form; anything else is `None`
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected options per filter group
///
/// Groups keep the taxonomy order; values within a group are a set, so
/// duplicates cannot occur and selection order does not matter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    groups: Vec<(String, BTreeSet<String>)>,
}

impl FilterSelection {
    /// Empty selection over the configured groups
    #[must_use]
    pub fn for_config(config: &CatalogConfig) -> Self {
        Self {
            groups: config
                .filter_groups
                .iter()
                .map(|group| (group.name.clone(), BTreeSet::new()))
                .collect(),
        }
    }

    /// Adds `value` to `group` if absent, removes it if present
    ///
    /// Returns `Some(true)` when the value is selected afterwards, `None`
    /// when the group does not exist. Values are not checked against the
    /// taxonomy here.
    pub fn toggle(&mut self, group: &str, value: &str) -> Option<bool> {
        let selected = self.values_mut(group)?;
        if selected.remove(value) {
            Some(false)
        } else {
            selected.insert(value.to_string());
            Some(true)
        }
    }

    /// Selects `value` in `group` without toggling
    pub(crate) fn insert(&mut self, group: &str, value: &str) -> bool {
        self.values_mut(group)
            .is_some_and(|selected| selected.insert(value.to_string()))
    }

    fn values_mut(&mut self, group: &str) -> Option<&mut BTreeSet<String>> {
        self.groups
            .iter_mut()
            .find(|(name, _)| name == group)
            .map(|(_, selected)| selected)
    }

    /// Selected values of `group`
    #[must_use]
    pub fn selected(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, selected)| selected)
    }

    /// `true` if `value` is selected in `group`
    #[must_use]
    pub fn is_selected(&self, group: &str, value: &str) -> bool {
        self.selected(group).is_some_and(|selected| selected.contains(value))
    }

    /// Number of selected values across all groups
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.groups.iter().map(|(_, selected)| selected.len()).sum()
    }

    /// `true` when nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Empties every group
    pub fn clear(&mut self) {
        for (_, selected) in &mut self.groups {
            selected.clear();
        }
    }

    /// Groups with their selections, in taxonomy order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.groups
            .iter()
            .map(|(name, selected)| (name.as_str(), selected))
    }
}

/// The full set of user-chosen viewing parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Filter selections
    pub filters: FilterSelection,
    /// Sort key
    pub sort_by: String,
    /// Grid or list
    pub view_mode: ViewMode,
    /// 1-based page
    pub current_page: u32,
    /// Products per page
    pub items_per_page: u32,
}

impl CatalogQuery {
    /// Default query: no filters, default sort, grid, page 1
    #[must_use]
    pub fn initial(config: &CatalogConfig) -> Self {
        Self {
            filters: FilterSelection::for_config(config),
            sort_by: config.default_sort.clone(),
            view_mode: ViewMode::Grid,
            current_page: 1,
            items_per_page: config.items_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut filters = FilterSelection::for_config(&CatalogConfig::furnmart());
        assert_eq!(filters.toggle("category", "chairs"), Some(true));
        assert!(filters.is_selected("category", "chairs"));
        assert_eq!(filters.active_count(), 1);
        assert_eq!(filters.toggle("category", "chairs"), Some(false));
        assert!(filters.is_empty());
        assert_eq!(filters.toggle("colour", "red"), None);
    }

    #[test]
    fn groups_keep_taxonomy_order() {
        let mut filters = FilterSelection::for_config(&CatalogConfig::furnmart());
        filters.toggle("room", "office");
        filters.toggle("category", "beds");
        let names: Vec<&str> = filters.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["category", "price", "room", "features"]);
    }

    #[test]
    fn view_mode_params() {
        assert_eq!(ViewMode::from_param("list"), Some(ViewMode::List));
        assert_eq!(ViewMode::from_param("LIST"), None);
        assert_eq!(ViewMode::default().to_string(), "grid");
    }
}
