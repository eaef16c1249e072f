//! URL query-string form of a [`CatalogQuery`].
//!
//! ```text
//! ?category=chairs,sofas&price=under-1000&sort=price-low&page=3&view=list
//! ```
//!
//! - each non-empty filter group as `group=v1,v2`, in taxonomy order
//! - `sort` only when it differs from the default sort
//! - `page` only when above 1
//! - `view` only when not `grid`
//!
//! Decoding is lenient: unknown groups, options, sort keys and views are dropped
//! and reported, and page text is parsed then clamped.

use crate::config::{CatalogConfig, RESERVED_PARAMS};
use crate::error::CatalogError;
use crate::query::{CatalogQuery, ViewMode};
use furnmart_core::numeric::{self, Coerced};
use furnmart_core::query::QueryParams;

/// Sort parameter name
pub const SORT_PARAM: &str = "sort";
/// Page parameter name
pub const PAGE_PARAM: &str = "page";
/// View parameter name
pub const VIEW_PARAM: &str = "view";

const VALUE_SEPARATOR: &str = ",";

/// Result of decoding a query string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded query; its page is clamped to `1..=u32::MAX` only
    pub query: CatalogQuery,
    /// Page text as read, before clamping to the last page
    pub page: Coerced,
    /// Parts of the input that were dropped
    pub rejected: Vec<CatalogError>,
}

/// Encodes `query` without the leading `?`; empty for the default query
///
/// # Errors
///
/// Returns [`CatalogError::MalformedQuery`] if the pairs cannot be encoded.
pub fn encode(query: &CatalogQuery, config: &CatalogConfig) -> Result<String, CatalogError> {
    let mut params = QueryParams::new();

    for (group, selected) in query.filters.iter() {
        if !selected.is_empty() {
            let joined: Vec<&str> = selected.iter().map(String::as_str).collect();
            params.set(group, joined.join(VALUE_SEPARATOR));
        }
    }
    if query.sort_by != config.default_sort {
        params.set(SORT_PARAM, query.sort_by.as_str());
    }
    if query.current_page > 1 {
        params.set(PAGE_PARAM, query.current_page.to_string());
    }
    if query.view_mode != ViewMode::Grid {
        params.set(VIEW_PARAM, query.view_mode.as_str());
    }

    Ok(params.encode()?)
}

/// Decodes a query string, with or without its leading `?`
///
/// # Errors
///
/// Returns [`CatalogError::MalformedQuery`] if the input is not a query string.
pub fn decode(input: &str, config: &CatalogConfig) -> Result<Decoded, CatalogError> {
    let params = QueryParams::parse(input)?;
    let mut query = CatalogQuery::initial(config);
    let mut rejected = Vec::new();

    for key in params.keys() {
        if config.group(key).is_none() && !RESERVED_PARAMS.contains(&key) {
            rejected.push(CatalogError::UnknownFilterGroup(key.to_string()));
        }
    }

    for group in &config.filter_groups {
        let Some(joined) = params.get(&group.name) else {
            continue;
        };
        for value in joined.split(VALUE_SEPARATOR).filter(|v| !v.is_empty()) {
            if group.has_option(value) {
                query.filters.insert(&group.name, value);
            } else {
                rejected.push(CatalogError::UnknownFilterValue {
                    group: group.name.clone(),
                    value: value.to_string(),
                });
            }
        }
    }

    if let Some(sort) = params.get(SORT_PARAM) {
        if config.has_sort_key(sort) {
            query.sort_by = sort.to_string();
        } else {
            rejected.push(CatalogError::UnknownSortKey(sort.to_string()));
        }
    }

    let page = params
        .get(PAGE_PARAM)
        .map_or(Coerced::exact(1), |text| numeric::parse_clamped(text, &(1..=u32::MAX)));
    query.current_page = page.value;

    if let Some(view) = params.get(VIEW_PARAM) {
        match ViewMode::from_param(view) {
            Some(mode) => query.view_mode = mode,
            None => rejected.push(CatalogError::UnknownViewMode(view.to_string())),
        }
    }

    Ok(Decoded {
        query,
        page,
        rejected,
    })
}
