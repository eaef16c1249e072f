//! Integration tests running the catalog and search reducers inside a `Store`
//!
//! Covers the URL being rewritten after each mutation, rewrites finishing out
//! of order, the initial load from the location, and stale debounced
//! searches being dropped.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use furnmart_catalog::{
    CatalogAction, CatalogConfig, CatalogEnvironment, CatalogQueryEngine, CatalogReducer,
    CatalogState, SearchAction, SearchConfig, SearchReducer, SearchState, ViewMode,
};
use furnmart_runtime::Store;
use furnmart_testing::{RecordingHistory, StallFirstWrite};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

type CatalogStore = Store<CatalogState, CatalogAction, CatalogEnvironment, CatalogReducer>;

fn catalog_store(history: &RecordingHistory) -> CatalogStore {
    let engine = CatalogQueryEngine::new(Arc::new(CatalogConfig::furnmart())).unwrap();
    Store::new(
        CatalogState::new(engine),
        CatalogReducer::new(),
        CatalogEnvironment::new(Arc::new(history.clone())),
    )
}

async fn send(store: &CatalogStore, action: CatalogAction) {
    let mut handle = store.send(action).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();
}

fn toggle(group: &str, value: &str) -> CatalogAction {
    CatalogAction::ToggleFilter {
        group: group.to_string(),
        value: value.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn filter_scenario_rewrites_url() {
    let history = RecordingHistory::new();
    let store = catalog_store(&history);

    send(&store, toggle("category", "chairs")).await;
    send(&store, CatalogAction::GoToPage { page: 3 }).await;
    send(&store, toggle("price", "under-1000")).await;

    let (page, price) = store
        .state(|s| {
            let query = s.engine.query();
            (
                query.current_page,
                query.filters.selected("price").cloned().unwrap_or_default(),
            )
        })
        .await;
    assert_eq!(page, 1);
    assert_eq!(price.into_iter().collect::<Vec<_>>(), ["under-1000"]);
    assert_eq!(
        history.entries(),
        [
            "?category=chairs",
            "?category=chairs&page=3",
            "?category=chairs&price=under-1000",
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_rewrite_never_leaves_stale_url() {
    let history = RecordingHistory::new();
    let engine = CatalogQueryEngine::new(Arc::new(CatalogConfig::furnmart())).unwrap();
    let store = Store::new(
        CatalogState::new(engine),
        CatalogReducer::new(),
        CatalogEnvironment::new(Arc::new(StallFirstWrite::new(
            history.clone(),
            Duration::from_millis(50),
        ))),
    );

    let mut first = store.send(toggle("category", "chairs")).await.unwrap();
    let mut second = store.send(toggle("price", "under-1000")).await.unwrap();
    for handle in [&mut first, &mut second] {
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
    }

    let expected = store.state(|s| s.engine.location_search().unwrap()).await;
    assert_eq!(expected, "?category=chairs&price=under-1000");
    assert_eq!(history.current(), expected);
}

#[tokio::test]
async fn clearing_filters_returns_to_bare_path() {
    let history = RecordingHistory::new();
    let store = catalog_store(&history);

    send(&store, toggle("room", "office")).await;
    send(&store, CatalogAction::ClearAllFilters).await;

    assert_eq!(history.current(), "");
    assert_eq!(store.state(|s| s.engine.result_count()).await, 165);
}

#[tokio::test]
async fn sort_keeps_page_and_view_is_kept_in_url() {
    let history = RecordingHistory::new();
    let store = catalog_store(&history);

    send(&store, CatalogAction::GoToPage { page: 4 }).await;
    send(&store, CatalogAction::SetSort { key: "price-low".to_string() }).await;
    send(&store, CatalogAction::SetViewMode { mode: ViewMode::List }).await;

    assert_eq!(history.current(), "?sort=price-low&page=4&view=list");
}

#[tokio::test]
async fn load_from_url_canonicalizes_location() {
    furnmart_testing::helpers::init_test_tracing();
    let history = RecordingHistory::new();
    let store = catalog_store(&history);

    send(
        &store,
        CatalogAction::LoadFromUrl {
            search: "?price=under-1000&category=sofas,chairs,thrones&page=99".to_string(),
        },
    )
    .await;

    assert_eq!(
        history.current(),
        "?category=chairs%2Csofas&price=under-1000&page=12"
    );

    let reloaded = catalog_store(&RecordingHistory::new());
    send(
        &reloaded,
        CatalogAction::LoadFromUrl {
            search: history.current(),
        },
    )
    .await;
    let original = store.state(|s| s.engine.query().clone()).await;
    assert_eq!(reloaded.state(|s| s.engine.query().clone()).await, original);
}

#[tokio::test]
async fn only_last_keystroke_commits_search() {
    let config = SearchConfig {
        debounce_ms: 20,
        min_length: 3,
    };
    let store = Store::new(SearchState::default(), SearchReducer::new(), config);

    let mut handles = Vec::new();
    for text in ["s", "so", "sof", "sofa"] {
        handles.push(
            store
                .send(SearchAction::InputChanged { text: text.to_string() })
                .await
                .unwrap(),
        );
    }
    for handle in &mut handles {
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
    }

    let state = store.state(Clone::clone).await;
    assert_eq!(state.committed.as_deref(), Some("sofa"));
    assert_eq!(state.searches, 1);
    assert_eq!(state.token, 4);
}
