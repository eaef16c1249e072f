//! Integration tests running the cart reducer inside a `Store`
//!
//! Covers persistence through the storage collaborator, restore on start,
//! saves finishing out of order, and the cart staying correct when storage
//! rejects writes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use furnmart_cart::{
    CART_STORAGE_KEY, CartAction, CartEnvironment, CartError, CartEvent, CartLedger, CartReducer,
    CartState, CartView, ItemId, LineItem, PersistedCart, PromoTable, Quantity,
    WISHLIST_STORAGE_KEY, Wishlist,
};
use furnmart_core::environment::{Clock, Storage};
use furnmart_runtime::Store;
use furnmart_testing::{InMemoryStorage, RejectingStorage, StallFirstWrite, test_clock};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

fn chair() -> LineItem {
    LineItem::new(
        ItemId::new(1),
        "Modern Dining Chair",
        899,
        Quantity::clamped(2).0,
        "images/products/chair-1.jpg",
        "Beige",
    )
}

fn sofa() -> LineItem {
    LineItem::new(
        ItemId::new(2),
        "Velvet Sofa",
        1299,
        Quantity::ONE,
        "images/products/sofa-2.jpg",
        "Emerald",
    )
}

fn promos() -> Arc<PromoTable> {
    Arc::new(PromoTable::furnmart())
}

fn store_with(
    storage: Arc<dyn Storage>,
    ledger: CartLedger,
) -> Store<CartState, CartAction, CartEnvironment, CartReducer> {
    let env = CartEnvironment::new(Arc::new(test_clock()), storage);
    Store::new(CartState::new(ledger), CartReducer::new(), env)
}

async fn send(store: &Store<CartState, CartAction, CartEnvironment, CartReducer>, action: CartAction) {
    let mut handle = store.send(action).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn every_mutation_is_persisted() {
    let storage = InMemoryStorage::new();
    let store = store_with(Arc::new(storage.clone()), CartLedger::empty(promos()));

    send(&store, CartAction::AddItem { item: chair() }).await;
    send(&store, CartAction::AddItem { item: sofa() }).await;
    send(&store, CartAction::IncrementQuantity { item_id: ItemId::new(2) }).await;
    send(&store, CartAction::ApplyPromoCode { code: "save10".to_string() }).await;

    assert_eq!(storage.writes(), 4);

    let payload = storage.get(CART_STORAGE_KEY).unwrap();
    let persisted: PersistedCart = serde_json::from_str(&payload).unwrap();
    assert_eq!(persisted.items.len(), 2);
    assert_eq!(persisted.items[1].quantity.get(), 2);
    assert_eq!(persisted.promo_code.as_deref(), Some("SAVE10"));
    assert_eq!(persisted.saved_at, test_clock().now());
}

#[tokio::test]
async fn restored_cart_matches_saved_totals() {
    let storage = InMemoryStorage::new();
    let store = store_with(Arc::new(storage.clone()), CartLedger::empty(promos()));

    send(&store, CartAction::AddItem { item: chair() }).await;
    send(&store, CartAction::AddItem { item: sofa() }).await;
    send(&store, CartAction::ApplyPromoCode { code: "SAVE10".to_string() }).await;
    let before = store.state(|s| s.ledger.snapshot()).await;

    let restored = CartLedger::load(&storage, promos()).unwrap().unwrap();

    assert_eq!(restored.snapshot(), before);
    assert_eq!(before.subtotal, 3097);
    assert_eq!(before.discount, 310);
    assert_eq!(before.total, 2787);
}

#[tokio::test]
async fn rejected_writes_leave_cart_usable() {
    furnmart_testing::helpers::init_test_tracing();
    let store = store_with(Arc::new(RejectingStorage), CartLedger::empty(promos()));

    send(&store, CartAction::AddItem { item: chair() }).await;
    send(
        &store,
        CartAction::SetQuantityText {
            item_id: ItemId::new(1),
            text: "250".to_string(),
        },
    )
    .await;

    let (view, error) = store
        .state(|s| (s.ledger.view(), s.last_error.clone()))
        .await;
    let CartView::Populated(snapshot) = view else {
        panic!("expected a populated cart, got {view:?}");
    };
    assert_eq!(snapshot.item_count, 99);
    assert_eq!(snapshot.subtotal, 899 * 99);
    assert_eq!(error, None);
}

#[tokio::test]
async fn remove_then_checkout_reports_empty() {
    let storage = InMemoryStorage::new();
    let store = store_with(
        Arc::new(storage.clone()),
        CartLedger::new(vec![chair()], promos()),
    );

    send(&store, CartAction::RemoveItem { item_id: ItemId::new(1) }).await;
    assert_eq!(store.state(|s| s.ledger.view()).await, CartView::Empty);

    send(&store, CartAction::Checkout).await;
    assert_eq!(
        store.state(|s| s.last_error.clone()).await,
        Some(CartError::EmptyCart)
    );
}

#[tokio::test]
async fn checkout_carries_promo_and_totals() {
    let store = store_with(
        Arc::new(InMemoryStorage::new()),
        CartLedger::new(vec![chair(), sofa()], promos()),
    );

    send(&store, CartAction::ApplyPromoCode { code: " welcome ".to_string() }).await;
    send(&store, CartAction::Checkout).await;

    let event = store.state(|s| s.last_event.clone()).await;
    let Some(CartEvent::CheckoutReady(summary)) = event else {
        panic!("expected checkout summary, got {event:?}");
    };
    assert_eq!(summary.promo_code.as_deref(), Some("WELCOME"));
    assert_eq!(summary.totals.discount, 465);
    assert_eq!(summary.totals.total, 3097 - 465);
    assert_eq!(summary.items.len(), 2);
}

#[tokio::test]
async fn wishlist_round_trips_through_storage() {
    let storage = InMemoryStorage::new();
    let store = store_with(Arc::new(storage.clone()), CartLedger::empty(promos()));

    send(&store, CartAction::ToggleWishlist { product: "Velvet Sofa".to_string() }).await;
    send(&store, CartAction::ToggleWishlist { product: "Oak Bookshelf".to_string() }).await;
    send(&store, CartAction::ToggleWishlist { product: "Velvet Sofa".to_string() }).await;

    assert!(storage.get(WISHLIST_STORAGE_KEY).is_some());
    let wishlist = Wishlist::load(&storage).unwrap();
    assert_eq!(wishlist.products(), ["Oak Bookshelf".to_string()]);
    assert_eq!(store.state(|s| s.wishlist.clone()).await, wishlist);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_older_save_never_overwrites_newer_cart() {
    let storage = InMemoryStorage::new();
    let stalled = StallFirstWrite::new(storage.clone(), Duration::from_millis(50));
    let store = store_with(Arc::new(stalled), CartLedger::new(vec![chair()], promos()));

    let mut first = store
        .send(CartAction::SetQuantity { item_id: ItemId::new(1), quantity: 5 })
        .await
        .unwrap();
    let mut second = store
        .send(CartAction::SetQuantity { item_id: ItemId::new(1), quantity: 7 })
        .await
        .unwrap();
    for handle in [&mut first, &mut second] {
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
    }

    let saved: PersistedCart =
        serde_json::from_str(&storage.get(CART_STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(saved.items[0].quantity.get(), 7);
    assert_eq!(
        saved.items,
        store.state(|s| s.ledger.items().to_vec()).await
    );
}
