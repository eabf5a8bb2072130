//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                  - Liveness
//! GET  /health/ready                            - Readiness (catalog reachable)
//!
//! # Products
//! GET  /api/v1/product/search/{keyword}         - Keyword search (bare array)
//! GET  /api/v1/product/search/?keyword=        - Keyword as query (for `.` and `..`)
//! GET  /api/v1/product/product-count           - Total number of products
//! GET  /api/v1/product/product-list/{page}      - One page, newest first
//! POST /api/v1/product/product-filters          - Category and price filter
//! GET  /api/v1/product/product-photo/{id}       - Photo bytes
//!
//! # Categories
//! GET  /api/v1/category/get-category            - All categories
//!
//! # Auth
//! POST /api/v1/auth/register                    - Create an account
//! POST /api/v1/auth/login                       - Password login, issues a token
//! GET  /api/v1/auth/user-auth                   - Token check
//! ```

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/search/{keyword}", get(products::search))
        .route("/search/", get(products::search_without_keyword))
        .route("/product-count", get(products::product_count))
        .route("/product-list/{page}", get(products::product_list))
        .route("/product-filters", post(products::product_filters))
        .route("/product-photo/{id}", get(products::product_photo))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/get-category", get(categories::get_category))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/user-auth", get(auth::user_auth))
}

/// All routes, before state and middleware are attached.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/v1/product", product_routes())
        .nest("/api/v1/category", category_routes())
        .nest("/api/v1/auth", auth_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use emporium_core::{Category, Product};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::accounts::MemoryUserStore;
    use crate::catalog::{MemoryCatalog, Photo};
    use crate::config::ApiSettings;
    use crate::state::AppState;

    async fn catalog() -> Arc<MemoryCatalog> {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog
            .insert_category(Category {
                id: "c-light".into(),
                name: "Lighting".into(),
                slug: "lighting".into(),
            })
            .await;
        for i in 1..=8 {
            let category = if i % 2 == 0 { "c-light" } else { "c-other" };
            catalog
                .insert_product(
                    Product::new(
                        format!("p{i}").as_str(),
                        format!("Item {i}"),
                        format!("Description {i}"),
                        f64::from(i) * 10.0,
                        format!("item-{i}"),
                    )
                    .with_extra("category", category),
                )
                .await;
        }
        catalog
            .insert_product_with_photo(
                Product::new("lamp", "Desk LAMP", "warm", 15.0, "desk-lamp"),
                Photo {
                    content_type: "image/jpeg".into(),
                    bytes: vec![0xFF, 0xD8, 0xFF],
                },
            )
            .await;
        catalog
    }

    fn app_with(catalog: Arc<MemoryCatalog>) -> axum::Router {
        let state = AppState::new(
            catalog,
            Arc::new(MemoryUserStore::new()),
            ApiSettings::default(),
        );
        crate::app(state)
    }

    async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: &axum::Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_returns_bare_array() {
        let app = app_with(catalog().await);
        let (status, body) = get_json(&app, "/api/v1/product/search/lamp").await;

        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["_id"], "lamp");
        assert!(results[0].get("photo").is_none());
    }

    #[tokio::test]
    async fn test_search_keyword_is_percent_decoded_regex() {
        let app = app_with(catalog().await);
        let (status, body) = get_json(&app, "/api/v1/product/search/item%20%5B12%5D").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_without_keyword_is_empty() {
        let app = app_with(catalog().await);
        let (status, body) = get_json(&app, "/api/v1/product/search/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_search_keyword_in_query_string() {
        let app = app_with(catalog().await);

        let (status, body) = get_json(&app, "/api/v1/product/search/?keyword=.").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 9);

        let (_, body) = get_json(&app, "/api/v1/product/search/?keyword=..").await;
        assert_eq!(body.as_array().unwrap().len(), 9);

        let (_, body) = get_json(&app, "/api/v1/product/search/?keyword=").await;
        assert_eq!(body.as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_search_invalid_regex_is_400_envelope() {
        let app = app_with(catalog().await);
        let (status, body) = get_json(&app, "/api/v1/product/search/%28").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Error In Search Product API");
        assert_eq!(body["error"]["kind"], "invalid_pattern");
    }

    #[tokio::test]
    async fn test_search_datastore_down_is_400_envelope() {
        let catalog = catalog().await;
        catalog.set_offline(true);
        let app = app_with(catalog);
        let (status, body) = get_json(&app, "/api/v1/product/search/lamp").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Error In Search Product API");
        assert_eq!(body["error"]["kind"], "database");
    }

    /// Log lines written by the fmt subscriber, shared with the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_search_datastore_failure_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();
        // The current-thread test runtime polls the handler on this thread
        let _guard = tracing::subscriber::set_default(subscriber);

        let catalog = catalog().await;
        catalog.set_offline(true);
        let app = app_with(catalog);
        let (status, _) = get_json(&app, "/api/v1/product/search/lamp").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let output = logs.text();
        assert!(output.contains("ERROR"), "{output}");
        assert!(output.contains("Request error"), "{output}");
        assert!(output.contains("Search error"), "{output}");
    }

    #[tokio::test]
    async fn test_product_count_and_pages() {
        let app = app_with(catalog().await);

        let (_, count) = get_json(&app, "/api/v1/product/product-count").await;
        assert_eq!(count, json!({"success": true, "total": 9}));

        let (_, first) = get_json(&app, "/api/v1/product/product-list/1").await;
        let first = first["products"].as_array().unwrap();
        assert_eq!(first.len(), 6);
        assert_eq!(first[0]["_id"], "lamp");

        let (_, second) = get_json(&app, "/api/v1/product/product-list/2").await;
        assert_eq!(second["products"].as_array().unwrap().len(), 3);

        let (status, _) = get_json(&app, "/api/v1/product/product-list/0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_product_filters() {
        let app = app_with(catalog().await);
        let (status, body) = post_json(
            &app,
            "/api/v1/product/product-filters",
            &json!({"checked": ["c-light"], "radio": [20, 39]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["_id"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(ids, ["p2"]);

        let (status, _) = post_json(
            &app,
            "/api/v1/product/product-filters",
            &json!({"checked": [], "radio": [50, 10]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories() {
        let app = app_with(catalog().await);
        let (_, body) = get_json(&app, "/api/v1/category/get-category").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["category"][0]["slug"], "lighting");
    }

    #[tokio::test]
    async fn test_product_photo() {
        let app = app_with(catalog().await);
        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/product/product-photo/lamp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

        let (status, _) = get_json(&app, "/api/v1/product/product-photo/p1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_login_and_user_auth() {
        let app = app_with(catalog().await);
        let registration = json!({
            "name": "Ada", "email": "ada@example.com", "password": "pw123456",
            "phone": "555", "address": "1 Loop", "DOB": "1990-01-01", "answer": "blue"
        });

        let (status, body) = post_json(&app, "/api/v1/auth/register", &registration).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = post_json(&app, "/api/v1/auth/register", &registration).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": false, "message": "Already registered, please login"})
        );

        let (status, body) = post_json(
            &app,
            "/api/v1/auth/login",
            &json!({"email": "ada@example.com", "password": "nope"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": false, "message": "Invalid password"}));

        let (status, body) = post_json(
            &app,
            "/api/v1/auth/login",
            &json!({"email": "ghost@example.com", "password": "x"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Email is not registered");

        let (status, body) = post_json(
            &app,
            "/api/v1/auth/login",
            &json!({"email": "ada@example.com", "password": "pw123456"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["email"], "ada@example.com");
        let token = body["token"].as_str().unwrap().to_owned();

        let request = Request::get("/api/v1/auth/user-auth")
            .header(header::AUTHORIZATION, &token)
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({"ok": true}));

        let (status, _) = get_json(&app, "/api/v1/auth/user-auth").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let catalog = catalog().await;
        let app = app_with(Arc::clone(&catalog));

        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let ready = || Request::get("/health/ready").body(Body::empty()).unwrap();
        assert_eq!(send(&app, ready()).await.0, StatusCode::OK);
        catalog.set_offline(true);
        assert_eq!(send(&app, ready()).await.0, StatusCode::SERVICE_UNAVAILABLE);
    }
}
