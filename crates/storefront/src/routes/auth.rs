//! Authentication route handlers.
//!
//! Failures that the shopper can fix (duplicate email, wrong password,
//! missing field) come back as `{success: false, message}` envelopes through
//! `AppError`, which picks the status code.

use axum::{Json, extract::State};
use emporium_core::{ApiMessage, LoginRequest, LoginResponse, RegisterRequest};
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// `POST /api/v1/auth/register`
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state.auth().register(request).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(LoginResponse {
        status: ApiMessage::ok("User Register Successfully"),
        user: Some(user.profile()),
        token: None,
    }))
}

/// `POST /api/v1/auth/login`
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user, token) = state.auth().login(request).await?;
    set_sentry_user(&user.id, Some(&user.email));
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        status: ApiMessage::ok("login successfully"),
        user: Some(user.profile()),
        token: Some(token),
    }))
}

/// `GET /api/v1/auth/user-auth`: succeeds only with a valid token.
pub async fn user_auth(RequireAuth(_user): RequireAuth) -> Json<Value> {
    Json(json!({ "ok": true }))
}
