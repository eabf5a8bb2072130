//! Catalog records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{CategoryId, ProductId};
use super::price::{PriceRange, PriceRangeError};

/// A product as the catalog returns it.
///
/// Only the fields the storefront logic reads are typed. Anything else the
/// store returns (`category`, `quantity`, `shipping`, ...) is kept verbatim
/// in [`Product::extra`] so a snapshot written back out (for example into
/// the cart) carries the same document it was read from.
///
/// No normalization is applied: empty descriptions, unicode names and
/// duplicate records are all accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra fields.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            slug: slug.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra field, replacing any previous value under `key`.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The category id stored in the `category` field, if it is a string.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.extra
            .get("category")
            .and_then(Value::as_str)
            .map(CategoryId::from)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Body of `POST /api/v1/product/product-filters`.
///
/// `checked` lists the selected category ids; an empty list means "any
/// category". `radio` is either empty (no price filter) or a `[min, max]`
/// pair taken from one of the homepage price buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    #[serde(default)]
    pub checked: Vec<CategoryId>,
    #[serde(default)]
    pub radio: Vec<f64>,
}

impl ProductFilters {
    /// Whether any filter is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.checked.is_empty() || !self.radio.is_empty()
    }

    /// The price range selected through `radio`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `radio` is neither empty nor a valid `[min, max]` pair.
    pub fn price_range(&self) -> Result<Option<PriceRange>, PriceRangeError> {
        match self.radio.as_slice() {
            [] => Ok(None),
            [min, max] => PriceRange::new(*min, *max).map(Some),
            other => Err(PriceRangeError::WrongLength(other.len())),
        }
    }
}
