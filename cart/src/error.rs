//! Error types for the cart ledger.

use crate::types::ItemId;
use furnmart_core::environment::StorageError;
use thiserror::Error;

/// Failures a cart operation reports to its caller
///
/// None of these are fatal: the ledger is unchanged whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The code is not in the promo table
    #[error("Invalid promo code: {0}")]
    InvalidPromoCode(String),

    /// A different code is already active; it must be cleared first
    #[error("Promo code {active} is already applied (attempted {attempted})")]
    PromoAlreadyApplied {
        /// Code currently applied
        active: String,
        /// Code the caller tried to apply
        attempted: String,
    },

    /// No line item carries this id
    #[error("Cart item {0} not found")]
    ItemNotFound(ItemId),

    /// The operation needs at least one line item
    #[error("Cart is empty")]
    EmptyCart,

    /// The persistence collaborator failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Persisted cart data could not be encoded or decoded
    #[error("Cart serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CartError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Malformed promo table, raised at construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A code is blank after trimming
    #[error("Promo code must not be empty")]
    EmptyPromoCode,

    /// Two codes normalize to the same value
    #[error("Duplicate promo code: {0}")]
    DuplicatePromoCode(String),

    /// A percentage promo above 100 %
    #[error("Promo code {code} has percentage {value} above 100")]
    PercentageOutOfRange {
        /// Offending code
        code: String,
        /// Configured percentage
        value: u64,
    },
}
