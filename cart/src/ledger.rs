//! The cart ledger engine.
//!
//! Owns the line items and the applied promo code. Totals are never stored:
//! `subtotal`, `discount`, `total` and `item_count` are derived on every read,
//! so the discount is always a function of the current items and promo.
//!
//! Discount policy: the discount is clamped to the subtotal, so `total` is
//! never negative and `total == subtotal - discount` always holds.

use crate::error::CartError;
use crate::promo::{PromoRule, PromoTable, normalize_code};
use crate::types::{ItemId, LineItem, Quantity, QuantityUpdate};
use chrono::{DateTime, Utc};
use furnmart_core::environment::Storage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the persisted cart
pub const CART_STORAGE_KEY: &str = "furnmart_cart";

/// A promo code the ledger accepted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromo {
    /// Normalized code
    pub code: String,
    /// Rule the code maps to
    pub rule: PromoRule,
}

/// Result of a successful `apply_promo_code`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoApplied {
    /// Normalized code
    pub code: String,
    /// Discount now in effect
    pub discount: u64,
    /// `false` when the same code was already active (no double discount)
    pub newly_applied: bool,
}

/// Derived totals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// `Σ unit_price × quantity`
    pub subtotal: u64,
    /// Discount from the applied promo, at most `subtotal`
    pub discount: u64,
    /// `subtotal - discount`
    pub total: u64,
    /// `Σ quantity`
    pub item_count: u64,
}

/// What the UI should render
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartView {
    /// No line items; totals are not meaningful
    Empty,
    /// At least one line item
    Populated(CartSnapshot),
}

/// Everything a checkout step needs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    /// Line items in display order
    pub items: Vec<LineItem>,
    /// Totals at the time of checkout
    pub totals: CartSnapshot,
    /// Applied promo code, if any
    pub promo_code: Option<String>,
}

/// Serialized form of a ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCart {
    /// Line items in display order
    pub items: Vec<LineItem>,
    /// Applied promo code, if any
    pub promo_code: Option<String>,
    /// When the cart was written
    pub saved_at: DateTime<Utc>,
}

/// The cart ledger
#[derive(Clone, Debug)]
pub struct CartLedger {
    items: Vec<LineItem>,
    promo: Option<AppliedPromo>,
    promos: Arc<PromoTable>,
}

impl CartLedger {
    /// Creates a ledger from an initial item set
    ///
    /// Items sharing an id are merged into the first occurrence.
    #[must_use]
    pub fn new(items: Vec<LineItem>, promos: Arc<PromoTable>) -> Self {
        let mut ledger = Self {
            items: Vec::with_capacity(items.len()),
            promo: None,
            promos,
        };
        for item in items {
            ledger.add_item(item);
        }
        ledger
    }

    /// An empty ledger
    #[must_use]
    pub fn empty(promos: Arc<PromoTable>) -> Self {
        Self::new(Vec::new(), promos)
    }

    /// Line items in display order
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line item by id
    #[must_use]
    pub fn get(&self, item_id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Number of line items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` once the last item was removed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Applied promo code, if any
    #[must_use]
    pub fn promo_code(&self) -> Option<&str> {
        self.promo.as_ref().map(|promo| promo.code.as_str())
    }

    /// Adds an item, or adds its quantity to the line with the same id
    pub fn add_item(&mut self, item: LineItem) -> QuantityUpdate {
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            let requested = i64::from(existing.quantity.get()) + i64::from(item.quantity.get());
            let (quantity, adjusted) = Quantity::clamped(requested);
            existing.quantity = quantity;
            tracing::debug!(item_id = %item.id, %quantity, "Merged item into existing line");
            return QuantityUpdate {
                item_id: item.id,
                quantity,
                adjusted,
            };
        }

        tracing::debug!(item_id = %item.id, name = %item.name, "Added line item");
        let update = QuantityUpdate {
            item_id: item.id,
            quantity: item.quantity,
            adjusted: false,
        };
        self.items.push(item);
        update
    }

    /// Sets the quantity of a line, clamped into `[1, 99]`
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has `item_id`; the ledger
    /// is unchanged.
    pub fn set_quantity(&mut self, item_id: ItemId, quantity: i64) -> Result<QuantityUpdate, CartError> {
        self.store_quantity(item_id, Quantity::clamped(quantity))
    }

    /// Sets the quantity from a text field; non-numeric input becomes 1
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has `item_id`.
    pub fn set_quantity_text(&mut self, item_id: ItemId, text: &str) -> Result<QuantityUpdate, CartError> {
        self.store_quantity(item_id, Quantity::parse(text))
    }

    /// Adds `delta` to the current quantity (the +/- buttons)
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has `item_id`.
    pub fn adjust_quantity(&mut self, item_id: ItemId, delta: i64) -> Result<QuantityUpdate, CartError> {
        let current = self
            .get(item_id)
            .ok_or(CartError::ItemNotFound(item_id))?
            .quantity
            .get();
        self.set_quantity(item_id, i64::from(current).saturating_add(delta))
    }

    fn store_quantity(
        &mut self,
        item_id: ItemId,
        (quantity, adjusted): (Quantity, bool),
    ) -> Result<QuantityUpdate, CartError> {
        let Some(line) = self.items.iter_mut().find(|line| line.id == item_id) else {
            tracing::debug!(%item_id, "Quantity change for unknown item ignored");
            return Err(CartError::ItemNotFound(item_id));
        };
        line.quantity = quantity;
        if adjusted {
            tracing::debug!(%item_id, %quantity, "Quantity clamped into range");
        }
        Ok(QuantityUpdate {
            item_id,
            quantity,
            adjusted,
        })
    }

    /// Removes a line; removing an absent id is a no-op
    pub fn remove_item(&mut self, item_id: ItemId) -> Option<LineItem> {
        let index = self.items.iter().position(|line| line.id == item_id)?;
        let removed = self.items.remove(index);
        tracing::debug!(%item_id, remaining = self.items.len(), "Removed line item");
        Some(removed)
    }

    /// Applies a promo code; the first accepted code wins
    ///
    /// Re-applying the active code succeeds without changing anything.
    ///
    /// # Errors
    ///
    /// - [`CartError::PromoAlreadyApplied`] if a different code is active
    /// - [`CartError::InvalidPromoCode`] if the code is unknown
    pub fn apply_promo_code(&mut self, code: &str) -> Result<PromoApplied, CartError> {
        let normalized = normalize_code(code);

        if let Some(active) = &self.promo {
            if active.code == normalized {
                return Ok(PromoApplied {
                    code: normalized,
                    discount: self.discount(),
                    newly_applied: false,
                });
            }
            tracing::warn!(active = %active.code, attempted = %normalized, "Promo code locked");
            return Err(CartError::PromoAlreadyApplied {
                active: active.code.clone(),
                attempted: normalized,
            });
        }

        let Some((code, rule)) = self.promos.lookup(&normalized) else {
            tracing::warn!(code = %normalized, "Invalid promo code");
            return Err(CartError::InvalidPromoCode(normalized));
        };

        self.promo = Some(AppliedPromo {
            code: code.clone(),
            rule,
        });
        let discount = self.discount();
        tracing::debug!(%code, discount, "Promo code applied");
        Ok(PromoApplied {
            code,
            discount,
            newly_applied: true,
        })
    }

    /// Removes the applied promo code, unlocking the promo input
    pub fn clear_promo_code(&mut self) -> Option<String> {
        self.promo.take().map(|promo| promo.code)
    }

    /// `Σ unit_price × quantity`
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// Discount in effect, never more than the subtotal
    #[must_use]
    pub fn discount(&self) -> u64 {
        let subtotal = self.subtotal();
        self.promo
            .as_ref()
            .map_or(0, |promo| promo.rule.discount_for(subtotal).min(subtotal))
    }

    /// `Σ quantity`
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Derived totals
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let subtotal = self.subtotal();
        let discount = self.discount();
        CartSnapshot {
            subtotal,
            discount,
            total: subtotal - discount,
            item_count: self.item_count(),
        }
    }

    /// Empty or populated view for rendering
    #[must_use]
    pub fn view(&self) -> CartView {
        if self.is_empty() {
            CartView::Empty
        } else {
            CartView::Populated(self.snapshot())
        }
    }

    /// Summary handed to the checkout step
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] when there is nothing to check out.
    pub fn checkout_summary(&self) -> Result<CheckoutSummary, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }
        Ok(CheckoutSummary {
            items: self.items.clone(),
            totals: self.snapshot(),
            promo_code: self.promo_code().map(str::to_string),
        })
    }

    /// Serializable form of the ledger
    #[must_use]
    pub fn to_persisted(&self, saved_at: DateTime<Utc>) -> PersistedCart {
        PersistedCart {
            items: self.items.clone(),
            promo_code: self.promo_code().map(str::to_string),
            saved_at,
        }
    }

    /// Rebuilds a ledger from its persisted form
    ///
    /// A promo code missing from `promos` is dropped.
    #[must_use]
    pub fn restore(persisted: PersistedCart, promos: Arc<PromoTable>) -> Self {
        let mut ledger = Self::new(persisted.items, promos);
        if let Some(code) = persisted.promo_code {
            if let Err(error) = ledger.apply_promo_code(&code) {
                tracing::warn!(%error, "Dropped persisted promo code");
            }
        }
        ledger
    }

    /// Loads the ledger saved under [`CART_STORAGE_KEY`]
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if storage cannot be read, or
    /// [`CartError::Serialization`] if the stored payload is not a cart.
    pub fn load(storage: &dyn Storage, promos: Arc<PromoTable>) -> Result<Option<Self>, CartError> {
        let Some(payload) = storage.load(CART_STORAGE_KEY)? else {
            return Ok(None);
        };
        let persisted: PersistedCart = serde_json::from_str(&payload)?;
        Ok(Some(Self::restore(persisted, promos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: u32, price: u64, quantity: i64) -> LineItem {
        LineItem::new(
            ItemId::new(id),
            format!("Item {id}"),
            price,
            Quantity::clamped(quantity).0,
            format!("images/products/{id}.jpg"),
            "Oak",
        )
    }

    fn ledger(items: Vec<LineItem>) -> CartLedger {
        CartLedger::new(items, Arc::new(PromoTable::furnmart()))
    }

    /// The prototype's two-line cart: subtotal 899×2 + 2299 = 4097
    fn prototype_cart() -> CartLedger {
        ledger(vec![item(1, 899, 2), item(2, 2299, 1)])
    }

    #[test]
    fn snapshot_sums_lines() {
        let snapshot = prototype_cart().snapshot();
        assert_eq!(snapshot.subtotal, 4097);
        assert_eq!(snapshot.discount, 0);
        assert_eq!(snapshot.total, 4097);
        assert_eq!(snapshot.item_count, 3);
    }

    #[test]
    fn set_quantity_clamps() {
        let mut cart = prototype_cart();
        let id = ItemId::new(1);

        assert_eq!(cart.set_quantity(id, -5).unwrap().quantity.get(), 1);
        let update = cart.set_quantity(id, 150).unwrap();
        assert_eq!(update.quantity.get(), 99);
        assert!(update.adjusted);
        assert_eq!(cart.set_quantity_text(id, "abc").unwrap().quantity.get(), 1);
        assert!(!cart.set_quantity(id, 4).unwrap().adjusted);
        assert_eq!(cart.get(id).unwrap().quantity.get(), 4);
    }

    #[test]
    fn set_quantity_unknown_item_is_noop() {
        let mut cart = prototype_cart();
        let before = cart.snapshot();
        assert_eq!(
            cart.set_quantity(ItemId::new(42), 3),
            Err(CartError::ItemNotFound(ItemId::new(42)))
        );
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn adjust_quantity_stays_in_range() {
        let mut cart = ledger(vec![item(1, 100, 1)]);
        assert_eq!(cart.adjust_quantity(ItemId::new(1), -1).unwrap().quantity.get(), 1);
        cart.set_quantity(ItemId::new(1), 99).unwrap();
        let update = cart.adjust_quantity(ItemId::new(1), 1).unwrap();
        assert_eq!(update.quantity.get(), 99);
        assert!(update.adjusted);
    }

    #[test]
    fn add_item_merges_same_id() {
        let mut cart = prototype_cart();
        let update = cart.add_item(item(1, 899, 98));
        assert_eq!(update.quantity.get(), 99);
        assert!(update.adjusted);
        assert_eq!(cart.len(), 2);

        cart.add_item(item(3, 499, 1));
        assert_eq!(cart.items().last().map(|i| i.id), Some(ItemId::new(3)));
    }

    #[test]
    fn remove_last_item_empties_ledger() {
        let mut cart = prototype_cart();
        assert!(cart.remove_item(ItemId::new(1)).is_some());
        assert!(matches!(cart.view(), CartView::Populated(_)));
        assert!(cart.remove_item(ItemId::new(2)).is_some());

        assert!(cart.is_empty());
        assert_eq!(cart.view(), CartView::Empty);
        assert_eq!(cart.snapshot(), CartSnapshot::default());
        assert_eq!(cart.remove_item(ItemId::new(2)), None);
    }

    #[test]
    fn save10_on_3097() {
        let mut cart = ledger(vec![item(1, 899, 2), item(2, 1299, 1)]);
        assert_eq!(cart.subtotal(), 3097);

        let applied = cart.apply_promo_code(" save10 ").unwrap();
        assert_eq!(applied.code, "SAVE10");
        assert_eq!(applied.discount, 310);
        assert!(applied.newly_applied);
        assert_eq!(cart.snapshot().total, 2787);
    }

    #[test]
    fn reapplying_same_code_does_not_double_discount() {
        let mut cart = ledger(vec![item(1, 899, 2), item(2, 1299, 1)]);
        cart.apply_promo_code("SAVE10").unwrap();
        let again = cart.apply_promo_code("save10").unwrap();

        assert!(!again.newly_applied);
        assert_eq!(cart.snapshot().discount, 310);
        assert_eq!(cart.snapshot().total, 2787);
    }

    #[test]
    fn second_code_is_rejected_until_cleared() {
        let mut cart = prototype_cart();
        cart.apply_promo_code("SAVE10").unwrap();

        assert_eq!(
            cart.apply_promo_code("WELCOME"),
            Err(CartError::PromoAlreadyApplied {
                active: "SAVE10".to_string(),
                attempted: "WELCOME".to_string(),
            })
        );
        assert_eq!(cart.clear_promo_code(), Some("SAVE10".to_string()));
        assert_eq!(cart.apply_promo_code("WELCOME").unwrap().discount, 615);
    }

    #[test]
    fn invalid_code_leaves_state_unchanged() {
        let mut cart = prototype_cart();
        assert_eq!(
            cart.apply_promo_code("bogus"),
            Err(CartError::InvalidPromoCode("BOGUS".to_string()))
        );
        assert_eq!(cart.promo_code(), None);
        assert_eq!(cart.snapshot().discount, 0);
    }

    #[test]
    fn fixed_discount_clamps_to_subtotal() {
        let mut cart = ledger(vec![item(1, 150, 1)]);
        cart.apply_promo_code("FURNMART2025").unwrap();
        let snapshot = cart.snapshot();
        assert_eq!(snapshot.discount, 150);
        assert_eq!(snapshot.total, 0);
    }

    #[test]
    fn percentage_discount_follows_quantity() {
        let mut cart = ledger(vec![item(1, 1000, 1)]);
        cart.apply_promo_code("SAVE10").unwrap();
        assert_eq!(cart.discount(), 100);
        cart.set_quantity(ItemId::new(1), 3).unwrap();
        assert_eq!(cart.discount(), 300);
    }

    #[test]
    fn empty_ledger_keeps_code_but_no_discount() {
        let mut cart = ledger(vec![item(1, 1000, 1)]);
        cart.apply_promo_code("SAVE100").unwrap();
        cart.remove_item(ItemId::new(1));
        assert_eq!(cart.promo_code(), Some("SAVE100"));
        assert_eq!(cart.snapshot(), CartSnapshot::default());
        assert_eq!(cart.checkout_summary(), Err(CartError::EmptyCart));
    }

    #[test]
    fn persisted_round_trip_recomputes_discount() {
        let mut cart = prototype_cart();
        cart.apply_promo_code("WELCOME").unwrap();
        let persisted = cart.to_persisted(Utc::now());

        let json = serde_json::to_string(&persisted).unwrap();
        let restored = CartLedger::restore(
            serde_json::from_str(&json).unwrap(),
            Arc::new(PromoTable::furnmart()),
        );

        assert_eq!(restored.items(), cart.items());
        assert_eq!(restored.snapshot(), cart.snapshot());
        assert_eq!(restored.promo_code(), Some("WELCOME"));
    }

    #[test]
    fn restore_drops_unknown_promo() {
        let persisted = PersistedCart {
            items: vec![item(1, 500, 1)],
            promo_code: Some("EXPIRED".to_string()),
            saved_at: Utc::now(),
        };
        let restored = CartLedger::restore(persisted, Arc::new(PromoTable::furnmart()));
        assert_eq!(restored.promo_code(), None);
    }

    proptest! {
        #[test]
        fn totals_are_exact_sums(lines in furnmart_testing::properties::priced_lines(8)) {
            let items: Vec<LineItem> = lines
                .iter()
                .enumerate()
                .map(|(i, (price, qty))| item(u32::try_from(i).unwrap(), *price, i64::from(*qty)))
                .collect();
            let cart = ledger(items);
            let snapshot = cart.snapshot();

            let subtotal: u64 = lines.iter().map(|(p, q)| p * u64::from(*q)).sum();
            let count: u64 = lines.iter().map(|(_, q)| u64::from(*q)).sum();
            prop_assert_eq!(snapshot.subtotal, subtotal);
            prop_assert_eq!(snapshot.item_count, count);
            prop_assert_eq!(snapshot.total, subtotal);
        }

        #[test]
        fn quantity_text_always_in_range(text in furnmart_testing::properties::quantity_text()) {
            let mut cart = ledger(vec![item(1, 10, 1)]);
            let update = cart.set_quantity_text(ItemId::new(1), &text).unwrap();
            prop_assert!(Quantity::RANGE.contains(&update.quantity.get()));
        }

        #[test]
        fn discount_never_exceeds_subtotal(lines in furnmart_testing::properties::priced_lines(4)) {
            for code in ["SAVE10", "SAVE100", "WELCOME", "FURNMART2025"] {
                let items: Vec<LineItem> = lines
                    .iter()
                    .enumerate()
                    .map(|(i, (price, qty))| item(u32::try_from(i).unwrap(), *price, i64::from(*qty)))
                    .collect();
                let mut cart = ledger(items);
                cart.apply_promo_code(code).unwrap();
                let snapshot = cart.snapshot();
                prop_assert!(snapshot.discount <= snapshot.subtotal);
                prop_assert_eq!(snapshot.total, snapshot.subtotal - snapshot.discount);
            }
        }
    }
}
