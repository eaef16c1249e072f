//! # Furnmart Catalog
//!
//! Listing state for the catalog page: filter selections, sort key, grid or
//! list view and the current page, kept in sync with the page URL.
//!
//! - [`engine::CatalogQueryEngine`]: the synchronous engine
//! - [`url`]: query-string encoding and lenient decoding
//! - [`counter`]: the result-count seam and its placeholder heuristic
//! - [`reducer::CatalogReducer`]: actions in, URL rewrites out
//! - [`search::SearchReducer`]: debounced search-as-you-type
//!
//! ## Example
//!
//! ```
//! use furnmart_catalog::{CatalogConfig, CatalogQueryEngine};
//! use std::sync::Arc;
//!
//! let mut engine = CatalogQueryEngine::new(Arc::new(CatalogConfig::furnmart())).unwrap();
//! engine.toggle_filter("category", "chairs").unwrap();
//! engine.toggle_filter("price", "under-1000").unwrap();
//! assert_eq!(engine.location_search().unwrap(), "?category=chairs&price=under-1000");
//! assert_eq!(engine.result_count(), 135);
//! ```

pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod query;
pub mod reducer;
pub mod search;
pub mod url;

pub use config::{CatalogConfig, FilterGroup, HeuristicParams, PageBound};
pub use counter::{HeuristicCounter, ResultCounter};
pub use engine::{CatalogQueryEngine, FilterToggled};
pub use error::{CatalogError, ConfigError};
pub use query::{CatalogQuery, FilterSelection, ViewMode};
pub use reducer::{CatalogAction, CatalogEnvironment, CatalogEvent, CatalogReducer, CatalogState};
pub use search::{SearchAction, SearchConfig, SearchReducer, SearchState};
