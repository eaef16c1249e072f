//! Reducer wiring the catalog engine to listing controls.
//!
//! Every accepted mutation rewrites the address bar through the injected
//! [`History`] so the URL always mirrors the query. Rewrites carry the
//! state's [`Revision`]; a rewrite that arrives after a newer one is dropped.

use crate::engine::CatalogQueryEngine;
use crate::error::CatalogError;
use crate::query::ViewMode;
use furnmart_core::environment::History;
use furnmart_core::numeric::Coerced;
use furnmart_core::revision::{Revision, WriteGate};
use furnmart_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Actions the catalog page can send
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogAction {
    /// A filter checkbox changed
    ToggleFilter {
        /// Filter group
        group: String,
        /// Option value
        value: String,
    },
    /// The "clear filters" button
    ClearAllFilters,
    /// The sort select changed
    SetSort {
        /// Sort key
        key: String,
    },
    /// The grid/list buttons
    SetViewMode {
        /// New layout
        mode: ViewMode,
    },
    /// A page-number button
    GoToPage {
        /// Requested page
        page: i64,
    },
    /// The next-page button
    NextPage,
    /// The previous-page button
    PreviousPage,
    /// Initial load from the current location
    LoadFromUrl {
        /// Location search string, with or without `?`
        search: String,
    },
}

/// What the last accepted action did, for announcements
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A filter was applied or removed
    FilterToggled {
        /// Filter group
        group: String,
        /// Option value
        value: String,
        /// `true` if now applied
        selected: bool,
        /// Products now shown
        result_count: u32,
    },
    /// All filters cleared
    FiltersCleared {
        /// Products now shown
        result_count: u32,
    },
    /// Sort changed
    SortChanged {
        /// New sort key
        key: String,
    },
    /// Layout changed
    ViewChanged {
        /// New layout
        mode: ViewMode,
    },
    /// Page changed
    PageChanged(Coerced),
    /// Query restored from the URL
    QueryLoaded {
        /// Products now shown
        result_count: u32,
    },
}

/// State of the catalog page
#[derive(Clone, Debug)]
pub struct CatalogState {
    /// Filter, sort, view and paging state
    pub engine: CatalogQueryEngine,
    /// Outcome of the last accepted action
    pub last_event: Option<CatalogEvent>,
    /// Failure of the last action, if it failed
    pub last_error: Option<CatalogError>,
    /// Revision of the last scheduled URL rewrite
    pub revision: Revision,
}

impl CatalogState {
    /// Creates state around an engine
    #[must_use]
    pub const fn new(engine: CatalogQueryEngine) -> Self {
        Self {
            engine,
            last_event: None,
            last_error: None,
            revision: Revision::INITIAL,
        }
    }
}

/// Environment dependencies for the catalog reducer
///
/// Holds the write gate for the address bar; give each store its own
/// environment.
#[derive(Clone)]
pub struct CatalogEnvironment {
    /// Address-bar collaborator
    pub history: Arc<dyn History>,
    url_writes: WriteGate,
}

impl CatalogEnvironment {
    /// Creates a new `CatalogEnvironment`
    #[must_use]
    pub fn new(history: Arc<dyn History>) -> Self {
        Self {
            history,
            url_writes: WriteGate::new(),
        }
    }
}

/// Reducer for the catalog page
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Records `event` and schedules the URL rewrite
    fn accept(
        state: &mut CatalogState,
        env: &CatalogEnvironment,
        event: CatalogEvent,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        state.last_event = Some(event);
        match state.engine.location_search() {
            Ok(search) => {
                state.last_error = None;
                let revision = state.revision.bump();
                let history = Arc::clone(&env.history);
                let gate = env.url_writes.clone();
                smallvec![Effect::fire_and_forget(move || {
                    if !gate.apply(revision, || history.replace_search(&search)) {
                        tracing::debug!(%search, %revision, "Skipped URL rewrite superseded by a newer revision");
                    }
                })]
            },
            Err(error) => {
                tracing::warn!(%error, "Failed to encode catalog URL");
                state.last_error = Some(error);
                SmallVec::new()
            },
        }
    }

    fn reject(state: &mut CatalogState, error: CatalogError) -> SmallVec<[Effect<CatalogAction>; 4]> {
        tracing::warn!(%error, "Catalog action rejected");
        state.last_event = None;
        state.last_error = Some(error);
        SmallVec::new()
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CatalogAction::ToggleFilter { group, value } => {
                match state.engine.toggle_filter(&group, &value) {
                    Ok(toggled) => Self::accept(
                        state,
                        env,
                        CatalogEvent::FilterToggled {
                            group,
                            value,
                            selected: toggled.selected,
                            result_count: toggled.result_count,
                        },
                    ),
                    Err(error) => Self::reject(state, error),
                }
            },

            CatalogAction::ClearAllFilters => {
                state.engine.clear_all_filters();
                let result_count = state.engine.result_count();
                Self::accept(state, env, CatalogEvent::FiltersCleared { result_count })
            },

            CatalogAction::SetSort { key } => match state.engine.set_sort(&key) {
                Ok(()) => Self::accept(state, env, CatalogEvent::SortChanged { key }),
                Err(error) => Self::reject(state, error),
            },

            CatalogAction::SetViewMode { mode } => {
                state.engine.set_view_mode(mode);
                Self::accept(state, env, CatalogEvent::ViewChanged { mode })
            },

            CatalogAction::GoToPage { page } => {
                let page = state.engine.go_to_page(page);
                Self::accept(state, env, CatalogEvent::PageChanged(page))
            },

            CatalogAction::NextPage => {
                let page = state.engine.next_page();
                Self::accept(state, env, CatalogEvent::PageChanged(page))
            },

            CatalogAction::PreviousPage => {
                let page = state.engine.previous_page();
                Self::accept(state, env, CatalogEvent::PageChanged(page))
            },

            CatalogAction::LoadFromUrl { search } => {
                match state.engine.load_query_string(&search) {
                    Ok(()) => {
                        let result_count = state.engine.result_count();
                        Self::accept(state, env, CatalogEvent::QueryLoaded { result_count })
                    },
                    Err(error) => Self::reject(state, error),
                }
            },
        }
    }
}
