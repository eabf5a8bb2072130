//! Fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use emporium_core::{Category, LoginRequest, Product, ProductFilters, RegisterRequest};
use serde_json::Value;

use crate::api::{ApiError, JsonReply, StorefrontApi};
use crate::navigate::RecordingNavigator;
use crate::notify::RecordingNotifier;
use crate::state::ClientState;
use crate::storage::MemoryStorage;

const PAGE_SIZE: usize = 6;

/// A canned reply to an auth call.
pub enum Reply {
    Body(Value),
    Unavailable,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        body: String::new(),
    }
}

/// Scripted auth replies over a small in-memory catalog.
#[derive(Default)]
pub struct FakeApi {
    login_replies: Mutex<VecDeque<Reply>>,
    register_replies: Mutex<VecDeque<Reply>>,
    login_requests: Mutex<Vec<LoginRequest>>,
    register_requests: Mutex<Vec<RegisterRequest>>,
    searches: Mutex<Vec<String>>,
    filter_requests: Mutex<Vec<ProductFilters>>,
    pages: Mutex<Vec<u32>>,
    categories: Mutex<Vec<Category>>,
    products: Mutex<Vec<Product>>,
    offline: AtomicBool,
}

impl FakeApi {
    pub fn push_login(&self, reply: Reply) {
        lock(&self.login_replies).push_back(reply);
    }

    pub fn push_register(&self, reply: Reply) {
        lock(&self.register_replies).push_back(reply);
    }

    pub fn login_requests(&self) -> Vec<LoginRequest> {
        lock(&self.login_requests).clone()
    }

    pub fn register_requests(&self) -> Vec<RegisterRequest> {
        lock(&self.register_requests).clone()
    }

    pub fn searches(&self) -> Vec<String> {
        lock(&self.searches).clone()
    }

    pub fn filter_requests(&self) -> Vec<ProductFilters> {
        lock(&self.filter_requests).clone()
    }

    pub fn pages(&self) -> Vec<u32> {
        lock(&self.pages).clone()
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        *lock(&self.categories) = categories;
    }

    pub fn set_products(&self, products: Vec<Product>) {
        *lock(&self.products) = products;
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    fn reply(queue: &Mutex<VecDeque<Reply>>) -> Result<JsonReply, ApiError> {
        match lock(queue).pop_front() {
            Some(Reply::Body(value)) => Ok(JsonReply::from_value(value)),
            Some(Reply::Unavailable) | None => Err(unavailable()),
        }
    }
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<JsonReply, ApiError> {
        lock(&self.login_requests).push(request.clone());
        Self::reply(&self.login_replies)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<JsonReply, ApiError> {
        lock(&self.register_requests).push(request.clone());
        Self::reply(&self.register_replies)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Product>, ApiError> {
        lock(&self.searches).push(keyword.to_owned());
        self.check_online()?;
        let needle = keyword.to_lowercase();
        Ok(lock(&self.products)
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.check_online()?;
        Ok(lock(&self.categories).clone())
    }

    async fn product_count(&self) -> Result<u64, ApiError> {
        self.check_online()?;
        Ok(lock(&self.products).len() as u64)
    }

    async fn product_page(&self, page: u32) -> Result<Vec<Product>, ApiError> {
        lock(&self.pages).push(page);
        self.check_online()?;
        let skip = (page as usize).saturating_sub(1) * PAGE_SIZE;
        Ok(lock(&self.products)
            .iter()
            .skip(skip)
            .take(PAGE_SIZE)
            .cloned()
            .collect())
    }

    async fn filter_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, ApiError> {
        lock(&self.filter_requests).push(filters.clone());
        self.check_online()?;
        let range = filters
            .price_range()
            .map_err(|e| ApiError::Status {
                status: 400,
                body: e.to_string(),
            })?;
        Ok(lock(&self.products)
            .iter()
            .filter(|p| {
                filters.checked.is_empty()
                    || p.category_id().is_some_and(|c| filters.checked.contains(&c))
            })
            .filter(|p| range.as_ref().is_none_or(|r| r.contains(p.price)))
            .cloned()
            .collect())
    }
}

/// A client wired to fakes, with handles to each of them.
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: ClientState,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        let api = Arc::new(FakeApi::default());
        let storage = Arc::new(storage);
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ClientState::new(
            api.clone(),
            storage.clone(),
            notifier.clone(),
            navigator.clone(),
        );
        Self {
            api,
            storage,
            notifier,
            navigator,
            client,
        }
    }
}
