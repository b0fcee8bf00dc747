#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use vendor_performance_api::{app_router, config::AppConfig, db, AppState};

/// Helper harness for spinning up an application state backed by a fresh SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: Option<TempDir>,
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig::new(
        database_url,
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    )
}

impl TestApp {
    /// Construct a new test application over an in-memory database.
    pub async fn new() -> Self {
        let mut cfg = test_config("sqlite::memory:".to_string());
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        Self::build(cfg, None).await
    }

    /// Construct a test application over a database file with a pool of
    /// `max_connections`, so that concurrent requests run on separate
    /// connections and transactions.
    pub async fn with_file_database(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("vendor_performance.db");
        let mut cfg = test_config(format!("sqlite://{}?mode=rwc", path.display()));
        cfg.db_max_connections = max_connections;
        cfg.db_min_connections = 1;

        Self::build(cfg, Some(dir)).await
    }

    async fn build(cfg: AppConfig, db_dir: Option<TempDir>) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool));
        let router = app_router(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Sends a request through the full router and returns the status and parsed JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(payload) => {
                builder = builder.header("content-type", "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("valid request")).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }

    /// Posts a raw body with the given content type, bypassing JSON encoding.
    pub async fn raw_post(&self, uri: &str, content_type: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_owned()))
            .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Registers a vendor and returns its id.
    pub async fn create_vendor(&self, vendor_code: &str) -> i32 {
        let (status, body) = self
            .post(
                "/vendors",
                json!({
                    "name": format!("Vendor {vendor_code}"),
                    "contact_details": "orders@example.com",
                    "address": "1 Dock Road",
                    "vendor_code": vendor_code,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "vendor create failed: {body}");
        body["id"].as_i64().expect("vendor id") as i32
    }

    /// Creates a purchase order from a JSON payload and returns its id.
    pub async fn create_purchase_order(&self, payload: Value) -> i32 {
        let (status, body) = self.post("/purchase-orders", payload).await;
        assert_eq!(status, StatusCode::CREATED, "purchase order create failed: {body}");
        body["id"].as_i64().expect("purchase order id") as i32
    }
}

/// Purchase order payload with fixed dates: issued and ordered on 2024-03-01,
/// delivery due 2024-03-05.
pub fn purchase_order_payload(vendor_id: i32, po_number: &str) -> Value {
    json!({
        "po_number": po_number,
        "vendor_id": vendor_id,
        "order_date": "2024-03-01T09:00:00Z",
        "delivery_date": "2024-03-05T09:00:00Z",
        "items": [{"sku": "BOLT-10", "qty": 100}],
        "quantity": 100,
        "issue_date": "2024-03-01T09:00:00Z",
    })
}
