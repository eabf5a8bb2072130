//! Homepage view-model: category and price filters over the paged product feed.

use emporium_core::{Category, CategoryId, Product, ProductFilters, format_usd};

use crate::state::ClientState;
use crate::storage::StorageError;

/// A price filter choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    pub name: &'static str,
    pub range: [f64; 2],
}

pub const PRICE_BUCKETS: [PriceBucket; 6] = [
    PriceBucket {
        name: "$0 to $19",
        range: [0.0, 19.0],
    },
    PriceBucket {
        name: "$20 to $39",
        range: [20.0, 39.0],
    },
    PriceBucket {
        name: "$40 to $59",
        range: [40.0, 59.0],
    },
    PriceBucket {
        name: "$60 to $79",
        range: [60.0, 79.0],
    },
    PriceBucket {
        name: "$80 to $99",
        range: [80.0, 99.0],
    },
    PriceBucket {
        name: "$100 or more",
        range: [100.0, 9999.0],
    },
];

const DESCRIPTION_PREVIEW_CHARS: usize = 60;

/// Price as shown on a product card.
#[must_use]
pub fn card_price(product: &Product) -> String {
    format_usd(product.price)
}

/// First 60 characters of the description followed by `...`.
#[must_use]
pub fn card_description(product: &Product) -> String {
    let preview: String = product
        .description
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS)
        .collect();
    format!("{preview}...")
}

#[derive(Debug, Clone, Default)]
pub struct HomePage {
    categories: Vec<Category>,
    products: Vec<Product>,
    total: u64,
    page: u32,
    loading: bool,
    filters: ProductFilters,
}

impl HomePage {
    /// Fetch categories, the product count and the first page.
    ///
    /// Each feed that fails is logged and left empty.
    pub async fn load(client: &ClientState) -> Self {
        let mut page = Self {
            page: 1,
            ..Self::default()
        };

        match client.api().categories().await {
            Ok(categories) => page.categories = categories,
            Err(e) => tracing::error!(error = %e, "Failed to load categories"),
        }
        match client.api().product_count().await {
            Ok(total) => page.total = total,
            Err(e) => tracing::error!(error = %e, "Failed to load product count"),
        }
        page.refresh(client).await;
        page
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    /// Whether the "load more" control applies: unfiltered and short of the total.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.filters.is_active() && (self.products.len() as u64) < self.total
    }

    /// Append the next page of the unfiltered feed.
    pub async fn load_more(&mut self, client: &ClientState) {
        let next = self.page + 1;
        self.loading = true;
        match client.api().product_page(next).await {
            Ok(products) => {
                self.page = next;
                self.products.extend(products);
            }
            Err(e) => tracing::error!(error = %e, page = next, "Failed to load more products"),
        }
        self.loading = false;
    }

    /// Tick or untick a category and refetch.
    pub async fn filter_category(&mut self, client: &ClientState, id: &CategoryId, checked: bool) {
        self.filters.checked.retain(|c| c != id);
        if checked {
            self.filters.checked.push(id.clone());
        }
        self.refresh(client).await;
    }

    /// Pick a price bucket, or `None` for no price filter, and refetch.
    pub async fn set_price_range(&mut self, client: &ClientState, bucket: Option<&PriceBucket>) {
        self.filters.radio = bucket.map(|b| b.range.to_vec()).unwrap_or_default();
        self.refresh(client).await;
    }

    /// Drop every filter and show the first page again.
    pub async fn reset_filters(&mut self, client: &ClientState) {
        self.filters = ProductFilters::default();
        self.refresh(client).await;
    }

    /// Put `product` in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add_to_cart(client: &ClientState, product: &Product) -> Result<(), StorageError> {
        client.cart().add(product)
    }

    /// Reload the feed: the filter endpoint while any filter is set,
    /// otherwise page 1 of the plain listing.
    async fn refresh(&mut self, client: &ClientState) {
        self.loading = true;
        let result = if self.filters.is_active() {
            client.api().filter_products(&self.filters).await
        } else {
            client.api().product_page(1).await
        };

        match result {
            Ok(products) => {
                self.page = 1;
                self.products = products;
            }
            Err(e) => tracing::error!(error = %e, "Failed to load products"),
        }
        self.loading = false;
    }
}
