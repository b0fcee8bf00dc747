use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vendor Performance API",
        description = r#"
# Vendor Performance API

Tracks purchase orders per vendor and keeps four performance metrics current:

- **On-time delivery rate**: share of completed orders delivered on or before acknowledgment
- **Quality rating average**: mean rating of completed orders
- **Average response time**: seconds between issue and acknowledgment
- **Fulfilment rate**: share of orders that were completed

Metrics are recomputed whenever a purchase order is created, updated or acknowledged.

## Error Handling

Errors share one body format:

```json
{
  "error": "Not Found",
  "message": "Not found: Vendor 7 not found",
  "request_id": "4a1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    tags(
        (name = "vendors", description = "Vendor records and performance"),
        (name = "purchase-orders", description = "Purchase orders and acknowledgments"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Vendors
        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::get_vendor,
        crate::handlers::vendors::update_vendor,
        crate::handlers::vendors::delete_vendor,
        crate::handlers::vendors::get_vendor_performance,
        crate::handlers::vendors::get_vendor_history,

        // Purchase orders
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::acknowledge_purchase_order,

        // Health
        crate::health::health_check,
    ),
    components(
        schemas(
            crate::entities::vendor::Model,
            crate::entities::purchase_order::Model,
            crate::entities::historical_performance::Model,
            crate::entities::PurchaseOrderStatus,
            crate::services::vendors::CreateVendorInput,
            crate::services::vendors::UpdateVendorInput,
            crate::services::purchase_orders::CreatePurchaseOrderInput,
            crate::services::purchase_orders::UpdatePurchaseOrderInput,
            crate::handlers::vendors::VendorPerformanceResponse,
            crate::handlers::common::MessageResponse,
            crate::health::HealthInfo,
            crate::health::HealthStatus,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

/// Serves the generated document at `/api-docs/openapi.json`.
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDocV1::openapi()) }),
    )
}
