//! Reducer wiring the cart ledger and wishlist to UI actions.
//!
//! Every accepted mutation persists the affected state through the injected
//! [`Storage`]. Saves are stamped with the state's [`Revision`] and pass a
//! per-key [`WriteGate`], so a slow older save never overwrites a newer one.
//! Failures are recorded in `last_error` and produce no effects.

use crate::error::CartError;
use crate::ledger::{CART_STORAGE_KEY, CartLedger, CheckoutSummary, PromoApplied};
use crate::types::{ItemId, LineItem, QuantityUpdate};
use crate::wishlist::{WISHLIST_STORAGE_KEY, Wishlist};
use furnmart_core::environment::{Clock, Storage};
use furnmart_core::revision::{Revision, WriteGate};
use furnmart_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Actions the cart page can send
#[derive(Clone, Debug)]
pub enum CartAction {
    /// Add a product (or more of it) to the cart
    AddItem {
        /// Line to add
        item: LineItem,
    },
    /// Set a quantity from a numeric control
    SetQuantity {
        /// Target line
        item_id: ItemId,
        /// Requested quantity, clamped into `[1, 99]`
        quantity: i64,
    },
    /// Set a quantity from a text field
    SetQuantityText {
        /// Target line
        item_id: ItemId,
        /// Raw field contents
        text: String,
    },
    /// The `+` button
    IncrementQuantity {
        /// Target line
        item_id: ItemId,
    },
    /// The `-` button
    DecrementQuantity {
        /// Target line
        item_id: ItemId,
    },
    /// Remove a line
    RemoveItem {
        /// Target line
        item_id: ItemId,
    },
    /// Apply a promo code as typed
    ApplyPromoCode {
        /// Raw code
        code: String,
    },
    /// Remove the applied promo code
    ClearPromoCode,
    /// Add or remove a product from the wishlist
    ToggleWishlist {
        /// Product name
        product: String,
    },
    /// Ask for a checkout summary
    Checkout,
}

/// What the last accepted action did, for announcements and notifications
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    /// A line was added or merged
    ItemAdded(QuantityUpdate),
    /// A quantity changed
    QuantityChanged(QuantityUpdate),
    /// A line was removed
    ItemRemoved {
        /// Removed line
        item: LineItem,
        /// `true` if it was the last line
        cart_empty: bool,
    },
    /// A promo code is active
    PromoApplied(PromoApplied),
    /// The promo code was cleared
    PromoCleared {
        /// Code that was active
        code: String,
    },
    /// The wishlist changed
    WishlistToggled {
        /// Product name
        product: String,
        /// `true` if now on the wishlist
        saved: bool,
    },
    /// Checkout summary ready
    CheckoutReady(CheckoutSummary),
}

/// State of the cart page
#[derive(Clone, Debug)]
pub struct CartState {
    /// Line items and promo
    pub ledger: CartLedger,
    /// Saved products
    pub wishlist: Wishlist,
    /// Outcome of the last accepted action
    pub last_event: Option<CartEvent>,
    /// Failure of the last action, if it failed
    pub last_error: Option<CartError>,
    /// Revision of the last scheduled save
    pub revision: Revision,
}

impl CartState {
    /// Creates state around a ledger with an empty wishlist
    #[must_use]
    pub fn new(ledger: CartLedger) -> Self {
        Self::with_wishlist(ledger, Wishlist::new())
    }

    /// Creates state around a ledger and wishlist
    #[must_use]
    pub const fn with_wishlist(ledger: CartLedger, wishlist: Wishlist) -> Self {
        Self {
            ledger,
            wishlist,
            last_event: None,
            last_error: None,
            revision: Revision::INITIAL,
        }
    }

    /// Clears the outcome of the previous action
    fn settle(&mut self) {
        self.last_event = None;
        self.last_error = None;
    }

    fn accept(&mut self, event: CartEvent) {
        self.last_event = Some(event);
        self.last_error = None;
    }

    fn reject(&mut self, error: CartError) {
        self.last_event = None;
        self.last_error = Some(error);
    }
}

/// Environment dependencies for the cart reducer
///
/// Holds the write gates for both storage keys; give each store its own
/// environment.
#[derive(Clone)]
pub struct CartEnvironment {
    /// Clock for persisted timestamps
    pub clock: Arc<dyn Clock>,
    /// Persistence collaborator
    pub storage: Arc<dyn Storage>,
    cart_writes: WriteGate,
    wishlist_writes: WriteGate,
}

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn Storage>) -> Self {
        Self {
            clock,
            storage,
            cart_writes: WriteGate::new(),
            wishlist_writes: WriteGate::new(),
        }
    }
}

/// Reducer for the cart page
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn save_effect(
        state: &mut CartState,
        env: &CartEnvironment,
        gate: &WriteGate,
        key: &'static str,
        payload: String,
    ) -> Effect<CartAction> {
        let revision = state.revision.bump();
        let storage = Arc::clone(&env.storage);
        let gate = gate.clone();
        Effect::fire_and_forget(move || {
            let applied = gate.apply(revision, || {
                if let Err(error) = storage.save(key, &payload) {
                    tracing::warn!(%error, key, %revision, "Failed to persist cart state");
                }
            });
            if !applied {
                tracing::debug!(key, %revision, "Skipped save superseded by a newer revision");
            }
        })
    }

    fn persist_ledger(state: &mut CartState, env: &CartEnvironment) -> SmallVec<[Effect<CartAction>; 4]> {
        let persisted = state.ledger.to_persisted(env.clock.now());
        match serde_json::to_string(&persisted) {
            Ok(payload) => {
                smallvec![Self::save_effect(state, env, &env.cart_writes, CART_STORAGE_KEY, payload)]
            },
            Err(error) => {
                state.last_error = Some(error.into());
                SmallVec::new()
            },
        }
    }

    fn persist_wishlist(state: &mut CartState, env: &CartEnvironment) -> SmallVec<[Effect<CartAction>; 4]> {
        match serde_json::to_string(&state.wishlist) {
            Ok(payload) => smallvec![Self::save_effect(
                state,
                env,
                &env.wishlist_writes,
                WISHLIST_STORAGE_KEY,
                payload
            )],
            Err(error) => {
                state.last_error = Some(error.into());
                SmallVec::new()
            },
        }
    }

    fn quantity_result(
        state: &mut CartState,
        env: &CartEnvironment,
        result: Result<QuantityUpdate, CartError>,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        match result {
            Ok(update) => {
                state.accept(CartEvent::QuantityChanged(update));
                Self::persist_ledger(state, env)
            },
            Err(error) => {
                state.reject(error);
                SmallVec::new()
            },
        }
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::AddItem { item } => {
                let update = state.ledger.add_item(item);
                state.accept(CartEvent::ItemAdded(update));
                Self::persist_ledger(state, env)
            },

            CartAction::SetQuantity { item_id, quantity } => {
                let result = state.ledger.set_quantity(item_id, quantity);
                Self::quantity_result(state, env, result)
            },

            CartAction::SetQuantityText { item_id, text } => {
                let result = state.ledger.set_quantity_text(item_id, &text);
                Self::quantity_result(state, env, result)
            },

            CartAction::IncrementQuantity { item_id } => {
                let result = state.ledger.adjust_quantity(item_id, 1);
                Self::quantity_result(state, env, result)
            },

            CartAction::DecrementQuantity { item_id } => {
                let result = state.ledger.adjust_quantity(item_id, -1);
                Self::quantity_result(state, env, result)
            },

            CartAction::RemoveItem { item_id } => {
                // Idempotent: an absent id changes nothing and is not an error
                let Some(item) = state.ledger.remove_item(item_id) else {
                    state.settle();
                    return SmallVec::new();
                };
                let cart_empty = state.ledger.is_empty();
                state.accept(CartEvent::ItemRemoved { item, cart_empty });
                Self::persist_ledger(state, env)
            },

            CartAction::ApplyPromoCode { code } => match state.ledger.apply_promo_code(&code) {
                Ok(applied) => {
                    let newly_applied = applied.newly_applied;
                    state.accept(CartEvent::PromoApplied(applied));
                    if newly_applied {
                        Self::persist_ledger(state, env)
                    } else {
                        SmallVec::new()
                    }
                },
                Err(error) => {
                    state.reject(error);
                    SmallVec::new()
                },
            },

            CartAction::ClearPromoCode => {
                let Some(code) = state.ledger.clear_promo_code() else {
                    state.settle();
                    return SmallVec::new();
                };
                state.accept(CartEvent::PromoCleared { code });
                Self::persist_ledger(state, env)
            },

            CartAction::ToggleWishlist { product } => {
                let saved = state.wishlist.toggle(&product);
                tracing::debug!(%product, saved, "Wishlist toggled");
                state.accept(CartEvent::WishlistToggled { product, saved });
                Self::persist_wishlist(state, env)
            },

            CartAction::Checkout => {
                match state.ledger.checkout_summary() {
                    Ok(summary) => {
                        tracing::info!(
                            total = summary.totals.total,
                            promo_code = ?summary.promo_code,
                            "Proceeding to checkout"
                        );
                        state.accept(CartEvent::CheckoutReady(summary));
                    },
                    Err(error) => state.reject(error),
                }
                SmallVec::new()
            },
        }
    }
}
