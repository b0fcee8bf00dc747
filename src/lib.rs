//! Vendor Performance API Library
//!
//! Tracks purchase orders per vendor and keeps each vendor's delivery,
//! quality, responsiveness and fulfilment metrics in step with its orders.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self { db, services }
    }
}

/// Resource routes, without state attached.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/vendors", handlers::vendors::vendor_routes())
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes(),
        )
        .nest("/health", health::health_routes())
}

/// Full application router: API routes, OpenAPI document, HTTP tracing and
/// request ids. Transport concerns (CORS, compression, timeouts) are layered
/// on by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "vendor-performance-api up" }))
        .merge(api_routes())
        .merge(openapi::openapi_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
