//! Category route handlers.

use axum::{Json, extract::State};
use emporium_core::Category;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub message: &'static str,
    pub category: Vec<Category>,
}

/// `GET /api/v1/category/get-category`
#[instrument(skip(state))]
pub async fn get_category(State(state): State<AppState>) -> Result<Json<CategoryListResponse>> {
    let category = state.catalog().categories().await?;
    Ok(Json(CategoryListResponse {
        success: true,
        message: "All Categories List",
        category,
    }))
}
