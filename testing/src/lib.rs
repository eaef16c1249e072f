//! # Furnmart Testing
//!
//! Testing utilities and helpers for the storefront state engines.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use furnmart_testing::{RecordingHistory, ReducerTest};
//!
//! let history = RecordingHistory::new();
//! ReducerTest::new(CatalogReducer::new())
//!     .with_env(CatalogEnvironment::new(Arc::new(history.clone())))
//!     .given_state(CatalogState::new(engine))
//!     .when_action(CatalogAction::ClearAllFilters)
//!     .then_state(|state| assert_eq!(state.engine.query().current_page, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use furnmart_core::environment::Clock;

mod storage_mocks;

pub use reducer_test::{ReducerTest, assertions};
pub use storage_mocks::{InMemoryStorage, RecordingHistory, RejectingStorage, StallFirstWrite};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use furnmart_testing::mocks::FixedClock;
    /// use furnmart_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber for the current test binary
    ///
    /// Honors `RUST_LOG`; repeated calls are ignored.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing strategies
///
/// Strategies produce plain values (strings, integers, tuples) so engine
/// crates can use them without this crate depending on them.
pub mod properties {
    use proptest::prelude::*;

    /// A sequence of `(group, value)` toggles drawn from a fixed taxonomy
    pub fn toggle_sequence(
        taxonomy: Vec<(String, Vec<String>)>,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<(String, String)>> {
        let pairs: Vec<(String, String)> = taxonomy
            .into_iter()
            .flat_map(|(group, values)| values.into_iter().map(move |v| (group.clone(), v)))
            .collect();
        proptest::collection::vec(proptest::sample::select(pairs), 0..=max_len)
    }

    /// Raw quantity text as a user might type it
    pub fn quantity_text() -> impl Strategy<Value = String> {
        prop_oneof![
            (-1000i64..1000).prop_map(|n| n.to_string()),
            "[a-z ]{0,6}",
            "[0-9]{1,4}[a-z]{0,3}",
        ]
    }

    /// `(unit_price, quantity)` pairs for line items
    pub fn priced_lines(max_len: usize) -> impl Strategy<Value = Vec<(u64, u32)>> {
        proptest::collection::vec((0u64..50_000, 1u32..=99), 0..=max_len)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
