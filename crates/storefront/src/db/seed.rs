//! Catalog seeding from a data file.
//!
//! The file format is whatever serde reads into [`SeedFile`]; the CLI feeds
//! it YAML:
//!
//! ```yaml
//! categories:
//!   - _id: lighting
//!     name: Lighting
//!     slug: lighting
//! products:
//!   - _id: desk-lamp
//!     name: Desk Lamp
//!     slug: desk-lamp
//!     description: Warm light for late nights
//!     price: 19.99
//!     category: lighting
//!     quantity: 12
//!     shipping: true
//!     photo: photos/desk-lamp.jpg
//! ```
//!
//! Rows are upserted by id inside one transaction, so seeding twice is safe.

use std::collections::{HashMap, HashSet};

use emporium_core::{Category, CategoryId, ProductId};
use serde::Deserialize;
use sqlx::PgPool;

use super::RepositoryError;
use crate::catalog::Photo;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub shipping: bool,
    /// Path of an image file, relative to the seed file.
    #[serde(default)]
    pub photo: Option<String>,
}

/// Rows written by [`SeedFile::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
}

impl SeedFile {
    /// Problems that would make seeding fail or produce a broken catalog.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut category_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(&category.id) {
                errors.push(format!("duplicate category id {}", category.id));
            }
            if category.name.trim().is_empty() {
                errors.push(format!("category {} has no name", category.id));
            }
        }

        let mut product_ids = HashSet::new();
        for product in &self.products {
            if !product_ids.insert(&product.id) {
                errors.push(format!("duplicate product id {}", product.id));
            }
            if product.name.trim().is_empty() {
                errors.push(format!("product {} has no name", product.id));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                errors.push(format!(
                    "product {} has invalid price {}",
                    product.id, product.price
                ));
            }
            if let Some(category) = &product.category
                && !category_ids.contains(category)
            {
                errors.push(format!(
                    "product {} references unknown category {category}",
                    product.id
                ));
            }
        }

        errors
    }

    /// Upsert every category and product.
    ///
    /// `photos` holds the image bytes for products that have one. A product
    /// without an entry keeps whatever photo it already had.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. Nothing is committed in that case.
    pub async fn apply(
        &self,
        pool: &PgPool,
        photos: &HashMap<ProductId, Photo>,
    ) -> Result<SeedSummary, RepositoryError> {
        let mut tx = pool.begin().await?;

        for category in &self.categories {
            sqlx::query(
                "INSERT INTO category (id, name, slug) VALUES ($1, $2, $3) \
                 ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, slug = EXCLUDED.slug",
            )
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .execute(&mut *tx)
            .await?;
        }

        for product in &self.products {
            let photo = photos.get(&product.id);
            sqlx::query(
                "INSERT INTO product \
                     (id, name, slug, description, price, category_id, quantity, shipping, \
                      photo, photo_content_type) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 ON CONFLICT (id) DO UPDATE SET \
                     name = EXCLUDED.name, slug = EXCLUDED.slug, \
                     description = EXCLUDED.description, price = EXCLUDED.price, \
                     category_id = EXCLUDED.category_id, quantity = EXCLUDED.quantity, \
                     shipping = EXCLUDED.shipping, \
                     photo = COALESCE(EXCLUDED.photo, product.photo), \
                     photo_content_type = COALESCE(EXCLUDED.photo_content_type, product.photo_content_type), \
                     updated_at = now()",
            )
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.quantity)
            .bind(product.shipping)
            .bind(photo.map(|p| p.bytes.as_slice()))
            .bind(photo.map(|p| p.content_type.as_str()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(SeedSummary {
            categories: self.categories.len(),
            products: self.products.len(),
        })
    }
}

/// Content type for a photo file, from its extension.
#[must_use]
pub fn photo_content_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
