//! Error types for the catalog query engine.

use furnmart_core::query::QueryError;
use thiserror::Error;

/// Input the catalog engine refused
///
/// The query is unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The group is not part of the filter taxonomy
    #[error("Unknown filter group: {0}")]
    UnknownFilterGroup(String),

    /// The value is not an option of its group
    #[error("Unknown value {value} for filter group {group}")]
    UnknownFilterValue {
        /// Filter group
        group: String,
        /// Rejected option value
        value: String,
    },

    /// The key is not a configured sort order
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// The layout is neither `grid` nor `list`
    #[error("Unknown view mode: {0}")]
    UnknownViewMode(String),

    /// The query string could not be decoded or encoded
    #[error(transparent)]
    MalformedQuery(#[from] QueryError),
}

/// Malformed catalog configuration, raised at construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No filter groups configured
    #[error("Catalog needs at least one filter group")]
    NoFilterGroups,

    /// A group has a blank name
    #[error("Filter group name must not be empty")]
    EmptyGroupName,

    /// Two groups share a name
    #[error("Duplicate filter group: {0}")]
    DuplicateGroup(String),

    /// A group name collides with a URL parameter the engine owns
    #[error("Filter group name {0} is reserved")]
    ReservedGroupName(String),

    /// A group lists no options
    #[error("Filter group {0} has no options")]
    EmptyGroup(String),

    /// An option value is blank or contains the `,` separator
    #[error("Invalid option {value:?} in filter group {group}")]
    InvalidOption {
        /// Filter group
        group: String,
        /// Offending option value
        value: String,
    },

    /// An option is listed twice in one group
    #[error("Duplicate option {value} in filter group {group}")]
    DuplicateOption {
        /// Filter group
        group: String,
        /// Repeated option value
        value: String,
    },

    /// No sort keys configured
    #[error("Catalog needs at least one sort key")]
    NoSortKeys,

    /// The default sort is missing from the sort keys
    #[error("Default sort {0} is not a configured sort key")]
    UnknownDefaultSort(String),

    /// `items_per_page` is zero
    #[error("Items per page must be positive")]
    ZeroItemsPerPage,

    /// A fixed page bound of zero
    #[error("Fixed page bound must be positive")]
    ZeroPageBound,
}
