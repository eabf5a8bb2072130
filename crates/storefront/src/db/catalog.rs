//! `PostgreSQL` catalog store.
//!
//! Keyword search uses the `~*` operator, the case-insensitive POSIX regex
//! match, so the keyword is interpreted as a pattern exactly like the
//! in-memory store does. Invalid patterns surface as database errors.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use emporium_core::{Category, CategoryId, Product, ProductId};
use serde_json::{Map, Value};
use sqlx::PgPool;

use super::RepositoryError;
use crate::catalog::{CatalogStore, Photo, ProductFilter, SearchFilter};

/// Columns returned by every product query. `photo` is never selected here.
const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, category_id, quantity, \
                               shipping, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    slug: String,
    description: String,
    price: f64,
    category_id: Option<CategoryId>,
    quantity: i32,
    shipping: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let mut extra = Map::new();
        extra.insert(
            "category".to_owned(),
            row.category_id.map_or(Value::Null, |id| Value::String(id.into_inner())),
        );
        extra.insert("quantity".to_owned(), Value::from(row.quantity));
        extra.insert("shipping".to_owned(), Value::Bool(row.shipping));
        extra.insert(
            "createdAt".to_owned(),
            Value::String(row.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        extra.insert(
            "updatedAt".to_owned(),
            Value::String(row.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            slug: row.slug,
            extra,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
}

/// Catalog backed by the `category` and `product` tables.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE name ~* $1 OR description ~* $1 \
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(filter.keyword())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug FROM category ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.id,
                name: row.name,
                slug: row.slug,
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(total)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative product count {total}")))
    }

    async fn page(&self, page: u32, per_page: u32) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        let limit = i64::from(per_page);
        let offset = i64::from(page.saturating_sub(1)) * limit;
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn filter(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE (cardinality($1::text[]) = 0 OR category_id = ANY($1)) \
               AND ($2::float8 IS NULL OR price >= $2) \
               AND ($3::float8 IS NULL OR price <= $3) \
             ORDER BY created_at, id"
        );
        let categories: Vec<String> = filter
            .categories
            .iter()
            .map(|id| id.as_str().to_owned())
            .collect();
        let min = filter.price.map(|range| range.min());
        let max = filter.price.map(|range| range.max());
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(categories)
            .bind(min)
            .bind(max)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn photo(&self, id: &ProductId) -> Result<Option<Photo>, RepositoryError> {
        let row: Option<(Option<Vec<u8>>, Option<String>)> =
            sqlx::query_as("SELECT photo, photo_content_type FROM product WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|(bytes, content_type)| {
            Some(Photo {
                bytes: bytes?,
                content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_owned()),
            })
        }))
    }
}
