//! # Furnmart Cart
//!
//! Cart ledger for the storefront: line items, clamped quantities, a single
//! promo code and derived totals, plus the wishlist.
//!
//! The [`ledger::CartLedger`] is a plain synchronous engine. The
//! [`reducer::CartReducer`] wires it to UI actions and persists the result
//! through the injected storage collaborator.
//!
//! ## Example
//!
//! ```
//! use furnmart_cart::{CartLedger, ItemId, LineItem, PromoTable, Quantity};
//! use std::sync::Arc;
//!
//! let mut ledger = CartLedger::empty(Arc::new(PromoTable::furnmart()));
//! ledger.add_item(LineItem::new(
//!     ItemId::new(1),
//!     "Modern Dining Chair",
//!     899,
//!     Quantity::clamped(2).0,
//!     "images/products/chair-1.jpg",
//!     "Beige",
//! ));
//! assert_eq!(ledger.subtotal(), 1798);
//! ```

pub mod error;
pub mod ledger;
pub mod promo;
pub mod reducer;
pub mod types;
pub mod wishlist;

pub use error::{CartError, ConfigError};
pub use ledger::{CART_STORAGE_KEY, CartLedger, CartSnapshot, CartView, CheckoutSummary, PersistedCart, PromoApplied};
pub use promo::{PromoKind, PromoRule, PromoTable};
pub use reducer::{CartAction, CartEnvironment, CartEvent, CartReducer, CartState};
pub use types::{ItemId, LineItem, Quantity, QuantityUpdate};
pub use wishlist::{WISHLIST_STORAGE_KEY, Wishlist};
