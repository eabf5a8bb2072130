//! Integration tests for Emporium.
//!
//! Each test starts the storefront router on an ephemeral port, backed by
//! the in-memory stores, and drives it through the real `reqwest` client
//! in `emporium-client`. No database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopper_flows` - Register, login, search, cart and checkout routing
//! - `catalog_browsing` - Homepage paging and filters over HTTP

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use emporium_client::ClientState;
use emporium_client::api::HttpApi;
use emporium_client::config::ClientConfig;
use emporium_client::navigate::{Navigator, RecordingNavigator};
use emporium_client::notify::{Notifier, RecordingNotifier};
use emporium_client::storage::{KeyValueStore, MemoryStorage};
use emporium_core::{Category, Product};
use emporium_storefront::accounts::MemoryUserStore;
use emporium_storefront::catalog::{CatalogStore, MemoryCatalog};
use emporium_storefront::config::ApiSettings;
use emporium_storefront::state::AppState;

/// A running storefront plus a client pointed at it.
pub struct TestContext {
    pub base_url: String,
    pub catalog: Arc<MemoryCatalog>,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: ClientState,
}

impl TestContext {
    /// Start a storefront over `catalog` with an empty account store.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(catalog: Arc<MemoryCatalog>) -> Self {
        let store: Arc<dyn CatalogStore> = catalog.clone();
        let state = AppState::new(
            store,
            Arc::new(MemoryUserStore::new()),
            ApiSettings::default(),
        );
        let app = emporium_storefront::app(state);

        #[allow(clippy::expect_used)]
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        #[allow(clippy::expect_used)]
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Test server stopped");
            }
        });

        let base_url = format!("http://{addr}");
        let storage = Arc::new(MemoryStorage::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let client = Self::client_for(&base_url, &storage, &notifier, &navigator);

        Self {
            base_url,
            catalog,
            storage,
            notifier,
            navigator,
            client,
        }
    }

    /// A second client over the same storage, as after a page reload.
    #[must_use]
    pub fn reload(&self) -> ClientState {
        Self::client_for(&self.base_url, &self.storage, &self.notifier, &self.navigator)
    }

    fn client_for(
        base_url: &str,
        storage: &Arc<MemoryStorage>,
        notifier: &Arc<RecordingNotifier>,
        navigator: &Arc<RecordingNavigator>,
    ) -> ClientState {
        #[allow(clippy::expect_used)]
        let config = ClientConfig::from_url(base_url).expect("Test server URL is valid");
        let storage: Arc<dyn KeyValueStore> = storage.clone();
        let notifier: Arc<dyn Notifier> = notifier.clone();
        let navigator: Arc<dyn Navigator> = navigator.clone();
        ClientState::new(Arc::new(HttpApi::new(&config)), storage, notifier, navigator)
    }
}

/// A small catalog: two categories, nine products priced 10 to 90, and a
/// lamp at 15.
pub async fn sample_catalog() -> Arc<MemoryCatalog> {
    let catalog = Arc::new(MemoryCatalog::new());
    catalog
        .insert_category(Category {
            id: "c-light".into(),
            name: "Lighting".into(),
            slug: "lighting".into(),
        })
        .await;
    catalog
        .insert_category(Category {
            id: "c-kitchen".into(),
            name: "Kitchen".into(),
            slug: "kitchen".into(),
        })
        .await;

    for i in 1..=9 {
        let category = if i % 3 == 0 { "c-light" } else { "c-kitchen" };
        catalog
            .insert_product(
                Product::new(
                    format!("p{i}").as_str(),
                    format!("Item {i}"),
                    format!("Everyday item number {i}"),
                    f64::from(i) * 10.0,
                    format!("item-{i}"),
                )
                .with_extra("category", category),
            )
            .await;
    }
    catalog
        .insert_product(
            Product::new("lamp", "Desk Lamp", "Warm light for late nights", 15.0, "desk-lamp")
                .with_extra("category", "c-light"),
        )
        .await;

    catalog
}
