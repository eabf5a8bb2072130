//! Catalog queries and the store abstraction behind them.
//!
//! Handlers talk to a [`CatalogStore`] trait object so the same routes run
//! against `PostgreSQL` in production ([`crate::db::PgCatalog`]) and against
//! [`MemoryCatalog`] in tests.

pub mod memory;

use async_trait::async_trait;
use emporium_core::{
    Category, CategoryId, PriceRange, PriceRangeError, Product, ProductFilters, ProductId,
};
use regex::{Regex, RegexBuilder};
use serde_json::{Value, json};

use crate::db::RepositoryError;

pub use memory::MemoryCatalog;

/// Keyword search over product `name` and `description`.
///
/// The keyword is used verbatim as a case-insensitive regular expression.
/// It is not escaped, trimmed or length-limited, so `.*` is a wildcard and
/// an empty keyword matches every product. An absent keyword matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    keyword: Option<String>,
}

impl SearchFilter {
    #[must_use]
    pub const fn from_keyword(keyword: Option<String>) -> Self {
        Self { keyword }
    }

    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Document form of the filter.
    ///
    /// ```
    /// use emporium_storefront::catalog::SearchFilter;
    /// use serde_json::json;
    ///
    /// let filter = SearchFilter::from_keyword(Some("lamp".into()));
    /// assert_eq!(
    ///     filter.to_document(),
    ///     json!({"$or": [
    ///         {"name": {"$regex": "lamp", "$options": "i"}},
    ///         {"description": {"$regex": "lamp", "$options": "i"}}
    ///     ]})
    /// );
    /// ```
    #[must_use]
    pub fn to_document(&self) -> Value {
        let clause = json!({ "$regex": self.keyword, "$options": "i" });
        json!({
            "$or": [
                { "name": clause },
                { "description": clause },
            ]
        })
    }

    /// Compile the keyword for in-process matching.
    ///
    /// Returns `Ok(None)` when there is no keyword.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidPattern` if the keyword is not a
    /// valid regular expression.
    pub fn compile(&self) -> Result<Option<Regex>, RepositoryError> {
        self.keyword
            .as_deref()
            .map(|keyword| {
                RegexBuilder::new(keyword)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RepositoryError::InvalidPattern(e.to_string()))
            })
            .transpose()
    }
}

/// Category and price filter for the homepage listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Any of these categories. Empty means no category restriction.
    pub categories: Vec<CategoryId>,
    /// Inclusive price bounds.
    pub price: Option<PriceRange>,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self.categories.is_empty()
            || product
                .category_id()
                .is_some_and(|id| self.categories.contains(&id));
        let price_ok = self.price.is_none_or(|range| range.contains(product.price));
        category_ok && price_ok
    }
}

impl TryFrom<ProductFilters> for ProductFilter {
    type Error = PriceRangeError;

    fn try_from(body: ProductFilters) -> Result<Self, Self::Error> {
        let price = body.price_range()?;
        Ok(Self {
            categories: body.checked,
            price,
        })
    }
}

/// A product photo as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Read access to the product catalog.
///
/// Result rows never carry photo bytes; photos are fetched separately.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap connectivity check used by the readiness endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Products whose name or description matches the filter, in store order.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Product>, RepositoryError>;

    async fn categories(&self) -> Result<Vec<Category>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// One page of products, newest first. `page` starts at 1.
    async fn page(&self, page: u32, per_page: u32) -> Result<Vec<Product>, RepositoryError>;

    async fn filter(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    async fn photo(&self, id: &ProductId) -> Result<Option<Photo>, RepositoryError>;
}
