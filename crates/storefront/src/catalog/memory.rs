//! In-process catalog used by tests and local demos.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use emporium_core::{Category, Product, ProductId};
use tokio::sync::RwLock;

use super::{CatalogStore, Photo, ProductFilter, SearchFilter};
use crate::db::RepositoryError;

#[derive(Debug, Clone)]
struct Entry {
    product: Product,
    photo: Option<Photo>,
}

/// A catalog held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    categories: RwLock<Vec<Category>>,
    products: RwLock<Vec<Entry>>,
    offline: AtomicBool,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_category(&self, category: Category) {
        self.categories.write().await.push(category);
    }

    pub async fn insert_product(&self, product: Product) {
        self.products.write().await.push(Entry {
            product,
            photo: None,
        });
    }

    pub async fn insert_product_with_photo(&self, product: Product, photo: Photo) {
        self.products.write().await.push(Entry {
            product,
            photo: Some(photo),
        });
    }

    /// Make every query fail as if the datastore were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_online()
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Product>, RepositoryError> {
        self.check_online()?;
        let Some(regex) = filter.compile()? else {
            return Ok(Vec::new());
        };

        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|entry| {
                regex.is_match(&entry.product.name) || regex.is_match(&entry.product.description)
            })
            .map(|entry| entry.product.clone())
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        self.check_online()?;
        Ok(self.categories.read().await.clone())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.check_online()?;
        Ok(self.products.read().await.len() as u64)
    }

    async fn page(&self, page: u32, per_page: u32) -> Result<Vec<Product>, RepositoryError> {
        self.check_online()?;
        let skip = page.saturating_sub(1) as usize * per_page as usize;

        let products = self.products.read().await;
        Ok(products
            .iter()
            .rev()
            .skip(skip)
            .take(per_page as usize)
            .map(|entry| entry.product.clone())
            .collect())
    }

    async fn filter(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        self.check_online()?;
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|entry| filter.matches(&entry.product))
            .map(|entry| entry.product.clone())
            .collect())
    }

    async fn photo(&self, id: &ProductId) -> Result<Option<Photo>, RepositoryError> {
        self.check_online()?;
        let products = self.products.read().await;
        Ok(products
            .iter()
            .find(|entry| &entry.product.id == id)
            .and_then(|entry| entry.photo.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog
            .insert_product(Product::new("1", "Desk Lamp", "Warm light", 25.0, "desk-lamp"))
            .await;
        catalog
            .insert_product(Product::new("2", "Chair", "Pairs well with a LAMP", 80.0, "chair"))
            .await;
        catalog
            .insert_product(Product::new("3", "Rug", "", 120.0, "rug"))
            .await;
        catalog
    }

    fn search(keyword: Option<&str>) -> SearchFilter {
        SearchFilter::from_keyword(keyword.map(str::to_owned))
    }

    #[tokio::test]
    async fn test_search_matches_name_or_description() {
        let catalog = seeded().await;
        let found = catalog.search(&search(Some("lamp"))).await.unwrap();
        let ids: Vec<_> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[tokio::test]
    async fn test_empty_keyword_matches_everything() {
        let catalog = seeded().await;
        assert_eq!(catalog.search(&search(Some(""))).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_absent_keyword_matches_nothing() {
        let catalog = seeded().await;
        assert!(catalog.search(&search(None)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_regex_metacharacters_are_honored() {
        let catalog = seeded().await;
        assert_eq!(catalog.search(&search(Some(".*"))).await.unwrap().len(), 3);
        assert_eq!(catalog.search(&search(Some("^r"))).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_regex_is_an_error() {
        let catalog = seeded().await;
        let err = catalog.search(&search(Some("[unclosed"))).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let catalog = seeded().await;
        let first = catalog.page(1, 2).await.unwrap();
        let second = catalog.page(2, 2).await.unwrap();
        assert_eq!(first[0].id.as_str(), "3");
        assert_eq!(first[1].id.as_str(), "2");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let catalog = seeded().await;
        catalog.set_offline(true);
        assert!(catalog.ping().await.is_err());
        assert!(catalog.search(&search(Some("lamp"))).await.is_err());
    }

    #[tokio::test]
    async fn test_photo_lookup() {
        let catalog = MemoryCatalog::new();
        let photo = Photo {
            content_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        catalog
            .insert_product_with_photo(Product::new("p", "P", "", 1.0, "p"), photo.clone())
            .await;

        assert_eq!(catalog.photo(&ProductId::new("p")).await.unwrap(), Some(photo));
        assert_eq!(catalog.photo(&ProductId::new("missing")).await.unwrap(), None);
    }
}
