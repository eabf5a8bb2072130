//! Storefront API client.
//!
//! [`StorefrontApi`] is the seam the view-models and forms talk to.
//! [`HttpApi`] implements it over `reqwest`; tests substitute fakes.

use async_trait::async_trait;
use emporium_core::{Category, LoginRequest, Product, ProductFilters, RegisterRequest};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A JSON response body kept in both parsed and raw form.
///
/// The login form persists `raw` exactly as the server sent it and reads
/// the fields it needs from `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub value: Value,
    pub raw: String,
}

impl JsonReply {
    /// Parse a body.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not JSON.
    pub fn parse(raw: impl Into<String>) -> Result<Self, serde_json::Error> {
        let raw = raw.into();
        let value = serde_json::from_str(&raw)?;
        Ok(Self { value, raw })
    }

    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let raw = value.to_string();
        Self { value, raw }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CategoryList {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    category: Vec<Category>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductCount {
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ProductList {
    #[serde(default)]
    products: Vec<Product>,
}

/// The endpoints the client uses.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `POST /api/v1/auth/login`. The body is returned untouched, even `null`.
    async fn login(&self, request: &LoginRequest) -> Result<JsonReply, ApiError>;

    /// `POST /api/v1/auth/register`.
    async fn register(&self, request: &RegisterRequest) -> Result<JsonReply, ApiError>;

    /// `GET /api/v1/product/search/{keyword}`.
    async fn search(&self, keyword: &str) -> Result<Vec<Product>, ApiError>;

    /// `GET /api/v1/category/get-category`. Empty unless the server reports success.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// `GET /api/v1/product/product-count`.
    async fn product_count(&self) -> Result<u64, ApiError>;

    /// `GET /api/v1/product/product-list/{page}`, pages start at 1.
    async fn product_page(&self, page: u32) -> Result<Vec<Product>, ApiError>;

    /// `POST /api/v1/product/product-filters`.
    async fn filter_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, ApiError>;
}

/// Path of the search endpoint for `keyword`, relative to the API root.
///
/// The keyword is percent-encoded as one path segment. An empty keyword
/// leaves the trailing slash. `.` and `..` go in the query string instead:
/// URL parsing resolves them as dot segments even when percent-encoded.
#[must_use]
pub fn search_path(keyword: &str) -> String {
    if matches!(keyword, "." | "..") {
        return format!("api/v1/product/search/?keyword={keyword}");
    }
    format!("api/v1/product/search/{}", urlencoding::encode(keyword))
}

/// `reqwest`-backed [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApi {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let mut base_url = config.base_url.clone();
        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_raw<B: Serialize + Sync>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(payload)
            .send()
            .await?;
        Self::read_body(response).await
    }
}

#[async_trait]
impl StorefrontApi for HttpApi {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<JsonReply, ApiError> {
        let body = self.post_raw("api/v1/auth/login", request).await?;
        Ok(JsonReply::parse(body)?)
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<JsonReply, ApiError> {
        let body = self.post_raw("api/v1/auth/register", request).await?;
        Ok(JsonReply::parse(body)?)
    }

    #[instrument(skip(self))]
    async fn search(&self, keyword: &str) -> Result<Vec<Product>, ApiError> {
        self.get_json(&search_path(keyword)).await
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let list: CategoryList = self.get_json("api/v1/category/get-category").await?;
        Ok(if list.success { list.category } else { Vec::new() })
    }

    #[instrument(skip(self))]
    async fn product_count(&self) -> Result<u64, ApiError> {
        let count: ProductCount = self.get_json("api/v1/product/product-count").await?;
        Ok(count.total)
    }

    #[instrument(skip(self))]
    async fn product_page(&self, page: u32) -> Result<Vec<Product>, ApiError> {
        let list: ProductList = self
            .get_json(&format!("api/v1/product/product-list/{page}"))
            .await?;
        Ok(list.products)
    }

    #[instrument(skip(self))]
    async fn filter_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, ApiError> {
        let body = self
            .post_raw("api/v1/product/product-filters", filters)
            .await?;
        let list: ProductList = serde_json::from_str(&body)?;
        Ok(list.products)
    }
}
