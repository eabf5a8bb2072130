//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use emporium_core::{Product, ProductFilters, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{ProductFilter, SearchFilter};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductCountResponse {
    pub success: bool,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

impl ProductListResponse {
    const fn ok(products: Vec<Product>) -> Self {
        Self {
            success: true,
            products,
        }
    }
}

/// `GET /api/v1/product/search/{keyword}`
///
/// Answers with the bare array of matches.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<Product>>> {
    run_search(&state, Some(keyword)).await
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

/// `GET /api/v1/product/search/`, optionally with `?keyword=`.
///
/// Keywords such as `.` and `..` cannot travel as a path segment, so
/// clients send them here. Without a keyword nothing matches.
#[instrument(skip(state))]
pub async fn search_without_keyword(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    run_search(&state, query.keyword).await
}

async fn run_search(state: &AppState, keyword: Option<String>) -> Result<Json<Vec<Product>>> {
    let keyword_pair = keyword.as_deref().map(|k| [("keyword", k)]);
    add_breadcrumb(
        "search",
        "Product search",
        keyword_pair.as_ref().map(<[_; 1]>::as_slice),
    );

    let filter = SearchFilter::from_keyword(keyword);
    let results = state
        .catalog()
        .search(&filter)
        .await
        .map_err(AppError::Search)?;

    Ok(Json(results))
}

/// `GET /api/v1/product/product-count`
#[instrument(skip(state))]
pub async fn product_count(State(state): State<AppState>) -> Result<Json<ProductCountResponse>> {
    let total = state.catalog().count().await?;
    Ok(Json(ProductCountResponse {
        success: true,
        total,
    }))
}

/// `GET /api/v1/product/product-list/{page}`, newest first.
#[instrument(skip(state))]
pub async fn product_list(
    State(state): State<AppState>,
    Path(page): Path<u32>,
) -> Result<Json<ProductListResponse>> {
    if page == 0 {
        return Err(AppError::BadRequest("page starts at 1".to_string()));
    }

    let products = state
        .catalog()
        .page(page, state.settings().page_size)
        .await?;
    Ok(Json(ProductListResponse::ok(products)))
}

/// `POST /api/v1/product/product-filters`
#[instrument(skip(state))]
pub async fn product_filters(
    State(state): State<AppState>,
    Json(body): Json<ProductFilters>,
) -> Result<Json<ProductListResponse>> {
    let filter =
        ProductFilter::try_from(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let products = state.catalog().filter(&filter).await?;
    Ok(Json(ProductListResponse::ok(products)))
}

/// `GET /api/v1/product/product-photo/{id}`
#[instrument(skip(state))]
pub async fn product_photo(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let photo = state
        .catalog()
        .photo(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo".to_string()))?;

    Ok(([(CONTENT_TYPE, photo.content_type)], photo.bytes))
}
