//! Debounced search-as-you-type.
//!
//! Every keystroke bumps a monotonically increasing token and schedules a
//! delayed [`SearchAction::DebounceElapsed`] carrying it. When the delay
//! fires, a token that is no longer current belongs to superseded input and
//! is ignored, so only the last keystroke of a burst commits a search.

use furnmart_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Debounce settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a search commits, in milliseconds
    pub debounce_ms: u64,
    /// Shortest query (after trimming) that is searched
    pub min_length: usize,
}

impl SearchConfig {
    /// Quiet period as a `Duration`
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_length: 3,
        }
    }
}

/// Search box state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Current input text
    pub input: String,
    /// Token of the latest keystroke
    pub token: u64,
    /// Last query that was searched
    pub committed: Option<String>,
    /// Number of committed searches
    pub searches: u64,
}

/// Search box actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchAction {
    /// The input text changed
    InputChanged {
        /// New text
        text: String,
    },
    /// A debounce timer fired
    DebounceElapsed {
        /// Token captured when the timer was scheduled
        token: u64,
    },
    /// The search overlay was closed
    Clear,
}

/// Reducer for the search box
#[derive(Clone, Debug, Default)]
pub struct SearchReducer;

impl SearchReducer {
    /// Creates a new `SearchReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SearchReducer {
    type State = SearchState;
    type Action = SearchAction;
    type Environment = SearchConfig;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SearchAction::InputChanged { text } => {
                state.input = text;
                state.token += 1;
                smallvec![Effect::Delay {
                    duration: env.debounce(),
                    action: Box::new(SearchAction::DebounceElapsed { token: state.token }),
                }]
            },

            SearchAction::DebounceElapsed { token } => {
                if token != state.token {
                    tracing::trace!(token, current = state.token, "Stale search timer ignored");
                    return SmallVec::new();
                }
                let query = state.input.trim();
                if query.chars().count() < env.min_length {
                    return SmallVec::new();
                }
                if state.committed.as_deref() != Some(query) {
                    tracing::info!(query, "Searching");
                    state.committed = Some(query.to_string());
                    state.searches += 1;
                }
                SmallVec::new()
            },

            SearchAction::Clear => {
                state.input.clear();
                // Invalidates any pending timer
                state.token += 1;
                SmallVec::new()
            },
        }
    }
}
