//! Domain types for the cart ledger.

use furnmart_core::numeric::{self, Coerced};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Identifier of a line item, unique within one ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates an `ItemId`
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the inner value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantity of one line item, always within `[1, 99]`
///
/// Construction goes through [`Quantity::clamped`] or [`Quantity::parse`],
/// so an out-of-range quantity cannot exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest allowed quantity
    pub const MIN: u32 = 1;
    /// Largest allowed quantity
    pub const MAX: u32 = 99;
    /// Allowed range
    pub const RANGE: RangeInclusive<u32> = Self::MIN..=Self::MAX;

    /// A quantity of one
    pub const ONE: Self = Self(1);

    /// Clamps `value` into range, reporting whether it had to be corrected
    #[must_use]
    pub fn clamped(value: i64) -> (Self, bool) {
        Self::from_coerced(numeric::clamp(value, &Self::RANGE))
    }

    /// Parses text the way a quantity field is read; non-numeric input is 1
    #[must_use]
    pub fn parse(text: &str) -> (Self, bool) {
        Self::from_coerced(numeric::parse_clamped(text, &Self::RANGE))
    }

    const fn from_coerced(coerced: Coerced) -> (Self, bool) {
        (Self(coerced.value), coerced.adjusted)
    }

    /// Returns the inner value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self::clamped(value).0
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product entry in the cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier within the ledger
    pub id: ItemId,
    /// Product name for display
    pub name: String,
    /// Price of one unit, in whole currency units
    pub unit_price: u64,
    /// Number of units
    pub quantity: Quantity,
    /// Product image reference
    pub image_ref: String,
    /// Chosen variant (colour, finish)
    pub variant: String,
}

impl LineItem {
    /// Creates a line item
    #[must_use]
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        unit_price: u64,
        quantity: Quantity,
        image_ref: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            image_ref: image_ref.into(),
            variant: variant.into(),
        }
    }

    /// `unit_price × quantity`
    #[must_use]
    pub const fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity.get() as u64)
    }
}

/// Outcome of a quantity change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
    /// Line item that changed
    pub item_id: ItemId,
    /// Quantity after the change
    pub quantity: Quantity,
    /// `true` if the requested quantity was out of range and got clamped
    pub adjusted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_clamps_examples() {
        assert_eq!(Quantity::clamped(-5), (Quantity(1), true));
        assert_eq!(Quantity::clamped(150), (Quantity(99), true));
        assert_eq!(Quantity::clamped(7), (Quantity(7), false));
        assert_eq!(Quantity::parse("abc"), (Quantity(1), true));
        assert_eq!(Quantity::parse(" 12 "), (Quantity(12), false));
    }

    #[test]
    fn quantity_deserializes_clamped() {
        let quantity: Quantity = serde_json::from_str("250").unwrap();
        assert_eq!(quantity.get(), 99);
        assert_eq!(serde_json::to_string(&quantity).unwrap(), "99");
    }

    #[test]
    fn line_total_multiplies() {
        let item = LineItem::new(
            ItemId::new(1),
            "Modern Dining Chair",
            899,
            Quantity::clamped(2).0,
            "images/products/chair-1.jpg",
            "Beige",
        );
        assert_eq!(item.line_total(), 1798);
        assert_eq!(item.id.to_string(), "1");
    }
}
