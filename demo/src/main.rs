//! Scripted storefront session.
//!
//! Drives the catalog, search and cart stores the way the storefront pages
//! would: load the listing from a URL, refine it, search, fill the cart,
//! apply a promo code and check out. URL rewrites are printed; the cart is
//! persisted to an in-process storage and restored at the end.

mod config;
mod session;

use anyhow::Context;
use config::StorefrontConfig;
use furnmart_cart::{
    CartAction, CartEnvironment, CartLedger, CartReducer, CartState, CartView, ItemId, LineItem,
    Quantity, Wishlist,
};
use furnmart_catalog::{
    CatalogAction, CatalogEnvironment, CatalogQueryEngine, CatalogReducer, CatalogState,
    SearchAction, SearchReducer, SearchState, ViewMode,
};
use furnmart_core::environment::{Storage, SystemClock};
use furnmart_runtime::{EffectHandle, Store};
use session::{ConsoleHistory, SessionStorage};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EFFECT_TIMEOUT: Duration = Duration::from_secs(2);

async fn settle(mut handle: EffectHandle) -> anyhow::Result<()> {
    handle.wait_with_timeout(EFFECT_TIMEOUT).await?;
    Ok(())
}

fn product(id: u32, name: &str, price: u64, variant: &str) -> LineItem {
    LineItem::new(
        ItemId::new(id),
        name,
        price,
        Quantity::ONE,
        format!("images/products/product-{id}.jpg"),
        variant,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,furnmart_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env()?;
    let storage: Arc<dyn Storage> = Arc::new(SessionStorage::new());

    println!("=== Furnmart Storefront ===\n");

    // ========================================================================
    // Catalog
    // ========================================================================
    println!("Catalog page");
    let engine = CatalogQueryEngine::new(Arc::new(config.catalog.clone()))
        .context("invalid catalog configuration")?;
    let catalog = Store::new(
        CatalogState::new(engine),
        CatalogReducer::new(),
        CatalogEnvironment::new(Arc::new(ConsoleHistory::new("/catalog.html"))),
    );

    let script = [
        CatalogAction::LoadFromUrl {
            search: "?category=chairs&page=2".to_string(),
        },
        CatalogAction::ToggleFilter {
            group: "price".to_string(),
            value: "under-1000".to_string(),
        },
        CatalogAction::SetSort {
            key: "price-low".to_string(),
        },
        CatalogAction::SetViewMode {
            mode: ViewMode::List,
        },
        CatalogAction::GoToPage { page: 15 },
        CatalogAction::PreviousPage,
    ];
    for action in script {
        settle(catalog.send(action).await?).await?;
    }

    let (count, page, pages) = catalog
        .state(|s| {
            (
                s.engine.result_count(),
                s.engine.query().current_page,
                s.engine.max_pages(),
            )
        })
        .await;
    println!("  showing {count} products, page {page} of {pages}\n");

    // ========================================================================
    // Search
    // ========================================================================
    println!("Search");
    let search = Store::new(SearchState::default(), SearchReducer::new(), config.search);
    let mut pending = Vec::new();
    for text in ["s", "so", "sof", "sofa"] {
        pending.push(
            search
                .send(SearchAction::InputChanged {
                    text: text.to_string(),
                })
                .await?,
        );
    }
    for handle in pending {
        settle(handle).await?;
    }
    let committed = search.state(|s| s.committed.clone()).await;
    println!("  searched for {committed:?}\n");

    // ========================================================================
    // Cart
    // ========================================================================
    println!("Cart page");
    let promos = Arc::new(config.promos.clone());
    let ledger = CartLedger::load(storage.as_ref(), Arc::clone(&promos))?
        .unwrap_or_else(|| CartLedger::empty(Arc::clone(&promos)));
    let wishlist = Wishlist::load(storage.as_ref())?;
    let cart = Store::new(
        CartState::with_wishlist(ledger, wishlist),
        CartReducer::new(),
        CartEnvironment::new(Arc::new(SystemClock), Arc::clone(&storage)),
    );

    let script = [
        CartAction::AddItem {
            item: product(1, "Modern Dining Chair", 899, "Beige"),
        },
        CartAction::AddItem {
            item: product(1, "Modern Dining Chair", 899, "Beige"),
        },
        CartAction::AddItem {
            item: product(2, "Velvet Sofa", 1299, "Emerald"),
        },
        CartAction::AddItem {
            item: product(3, "Oak Side Table", 450, "Natural"),
        },
        CartAction::SetQuantityText {
            item_id: ItemId::new(3),
            text: "150".to_string(),
        },
        CartAction::RemoveItem {
            item_id: ItemId::new(3),
        },
        CartAction::ToggleWishlist {
            product: "Oak Side Table".to_string(),
        },
        CartAction::ApplyPromoCode {
            code: "save10".to_string(),
        },
        CartAction::ApplyPromoCode {
            code: "WELCOME".to_string(),
        },
        CartAction::Checkout,
    ];
    for action in script {
        settle(cart.send(action).await?).await?;
        let (event, error) = cart
            .state(|s| (s.last_event.clone(), s.last_error.clone()))
            .await;
        match (event, error) {
            (_, Some(error)) => println!("  rejected: {error}"),
            (Some(event), None) => println!("  {event:?}"),
            (None, None) => {},
        }
    }

    if let CartView::Populated(snapshot) = cart.state(|s| s.ledger.view()).await {
        println!(
            "\n  subtotal {}  discount {}  total {}  ({} items)",
            snapshot.subtotal, snapshot.discount, snapshot.total, snapshot.item_count
        );
    }

    let restored = CartLedger::load(storage.as_ref(), promos)?
        .context("cart was not persisted")?;
    println!("  restored from storage: total {}", restored.snapshot().total);

    // ========================================================================
    // Shutdown
    // ========================================================================
    catalog.shutdown(EFFECT_TIMEOUT).await?;
    search.shutdown(EFFECT_TIMEOUT).await?;
    cart.shutdown(EFFECT_TIMEOUT).await?;

    println!("\n=== Session complete ===");
    Ok(())
}
