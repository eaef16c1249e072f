//! # Furnmart Core
//!
//! Core traits and types shared by the storefront state engines.
//!
//! The storefront keeps two pieces of client-side state consistent: the
//! catalog query (filters, sort, view, page) and the cart ledger (line items,
//! promo code, totals). Both are written as reducers over plain state values.
//!
//! ## Core Concepts
//!
//! - **State**: The engine value a feature owns (cart ledger, catalog query)
//! - **Action**: Every UI intent the engine can receive
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (persist, rewrite URL, debounce)
//! - **Environment**: Collaborators injected via traits (`Clock`, `Storage`, `History`)
//!
//! ## Shared Leaves
//!
//! - [`numeric`]: parse-and-clamp coercion for quantities and page numbers
//! - [`query`]: ordered URL query-string codec
//! - [`revision`]: revision stamps that keep collaborator writes in order
//!
//! ## Example
//!
//! ```ignore
//! use furnmart_core::*;
//!
//! impl Reducer for CartReducer {
//!     type State = CartState;
//!     type Action = CartAction;
//!     type Environment = CartEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CartState,
//!         action: CartAction,
//!         env: &CartEnvironment,
//!     ) -> SmallVec<[Effect<CartAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Parse-and-clamp coercion for user-entered integers
pub mod numeric;

/// URL query-string codec
pub mod query;

/// Revision-ordered collaborator writes
pub mod revision;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The engine state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected collaborators this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CatalogReducer {
    ///     type State = CatalogState;
    ///     type Action = CatalogAction;
    ///     type Environment = CatalogEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut CatalogState,
    ///         action: CatalogAction,
    ///         env: &CatalogEnvironment,
    ///     ) -> SmallVec<[Effect<CatalogAction>; 4]> {
    ///         match action {
    ///             CatalogAction::ClearAllFilters => {
    ///                 state.engine.clear_all_filters();
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected collaborators
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected collaborators
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution): a reducer returns them, the store runs them.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Delayed action (debounce timers)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a fire-and-forget collaborator call
        ///
        /// The closure runs when the store executes the effect and never
        /// feeds an action back.
        pub fn fire_and_forget<F>(f: F) -> Effect<Action>
        where
            F: FnOnce() + Send + 'static,
            Action: Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                f();
                None
            }))
        }

        /// Returns `true` for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Collaborator traits
///
/// Everything outside the engines (time, browser storage, the address bar)
/// is abstracted behind a trait and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let clock = SystemClock;
    ///
    /// // Test - fixed time for deterministic tests
    /// let clock = FixedClock::new(time);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Errors raised by a [`Storage`] collaborator
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StorageError {
        /// The backing store refused the write (quota, private mode)
        #[error("Storage write rejected for key {key}: {reason}")]
        WriteRejected {
            /// Storage key
            key: String,
            /// Collaborator-supplied reason
            reason: String,
        },

        /// The backing store could not be read
        #[error("Storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Key/value persistence collaborator (browser `localStorage` or similar)
    ///
    /// Engines call `save` after each mutation and `load` once on start.
    /// Absence of persistence must not affect correctness within a session,
    /// see [`NullStorage`].
    pub trait Storage: Send + Sync {
        /// Store `payload` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing store rejects the write.
        fn save(&self, key: &str, payload: &str) -> Result<(), StorageError>;

        /// Load the payload stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing store cannot be read.
        fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    }

    /// Storage that keeps nothing
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NullStorage;

    impl Storage for NullStorage {
        fn save(&self, _key: &str, _payload: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
    }

    /// Address-bar collaborator
    ///
    /// `replace_search` rewrites the current location's search string without
    /// navigating or growing the history stack. An empty string means "no
    /// query" (bare pathname).
    pub trait History: Send + Sync {
        /// Replace the current search string (`""` or `"?k=v&..."`)
        fn replace_search(&self, search: &str);
    }
}
