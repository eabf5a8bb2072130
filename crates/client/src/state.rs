//! Everything one client instance shares between its pages.

use std::sync::Arc;

use crate::api::StorefrontApi;
use crate::auth::AuthContext;
use crate::cart::Cart;
use crate::navigate::{Navigation, Navigator};
use crate::notify::{Notifier, Toast};
use crate::search::SearchContext;
use crate::storage::KeyValueStore;

/// Client state shared by every page.
///
/// Cheaply cloneable via `Arc`. The auth session and cart are restored from
/// storage when the state is created.
#[derive(Clone)]
pub struct ClientState {
    inner: Arc<ClientStateInner>,
}

struct ClientStateInner {
    api: Arc<dyn StorefrontApi>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    auth: AuthContext,
    cart: Cart,
    search: SearchContext,
}

impl ClientState {
    #[must_use]
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let auth = AuthContext::restore(storage.as_ref());
        let cart = Cart::load(Arc::clone(&storage), Arc::clone(&notifier));

        Self {
            inner: Arc::new(ClientStateInner {
                api,
                storage,
                notifier,
                navigator,
                auth,
                cart,
                search: SearchContext::default(),
            }),
        }
    }

    #[must_use]
    pub fn api(&self) -> &dyn StorefrontApi {
        self.inner.api.as_ref()
    }

    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.inner.cart
    }

    #[must_use]
    pub fn search(&self) -> &SearchContext {
        &self.inner.search
    }

    pub fn notify(&self, toast: Toast) {
        self.inner.notifier.notify(toast);
    }

    pub fn navigate(&self, navigation: Navigation) {
        self.inner.navigator.navigate(navigation);
    }
}
