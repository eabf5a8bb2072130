//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::accounts::UserStore;
use crate::catalog::CatalogStore;
use crate::config::ApiSettings;
use crate::db::{PgCatalog, PgUserStore};
use crate::services::auth::AuthService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog and account stores plus request-time settings.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserStore>,
    settings: ApiSettings,
}

impl AppState {
    /// Create a new application state from any pair of stores.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        settings: ApiSettings,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                users,
                settings,
            }),
        }
    }

    /// State backed by `PostgreSQL` for both stores.
    #[must_use]
    pub fn postgres(pool: PgPool, settings: ApiSettings) -> Self {
        Self::new(
            Arc::new(PgCatalog::new(pool.clone())),
            Arc::new(PgUserStore::new(pool)),
            settings,
        )
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the account store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get a reference to the request-time settings.
    #[must_use]
    pub fn settings(&self) -> &ApiSettings {
        &self.inner.settings
    }

    /// Authentication service over the account store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users(), self.inner.settings.token_ttl)
    }
}
