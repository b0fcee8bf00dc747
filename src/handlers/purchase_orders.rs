use super::common::{created_response, success_response, AppJson, MessageResponse};
use crate::{
    entities::purchase_order,
    errors::ApiError,
    handlers::AppState,
    services::purchase_orders::{CreatePurchaseOrderInput, UpdatePurchaseOrderInput},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

pub const ACKNOWLEDGMENT_RECORDED: &str = "Acknowledgment recorded successfully";

/// Create a purchase order
#[utoipa::path(
    post,
    path = "/purchase-orders",
    request_body = CreatePurchaseOrderInput,
    responses(
        (status = 201, description = "Purchase order created", body = purchase_order::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "PO number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePurchaseOrderInput>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .create_purchase_order(payload)
        .await?;
    info!(po_id = order.id, vendor_id = order.vendor_id, "Purchase order created");
    Ok(created_response(order))
}

/// Get a purchase order
#[utoipa::path(
    get,
    path = "/purchase-orders/{po_id}",
    params(("po_id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order found", body = purchase_order::Model),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .get_purchase_order(po_id)
        .await?;
    Ok(success_response(order))
}

/// Update a purchase order
#[utoipa::path(
    put,
    path = "/purchase-orders/{po_id}",
    params(("po_id" = i32, Path, description = "Purchase order ID")),
    request_body = UpdatePurchaseOrderInput,
    responses(
        (status = 200, description = "Purchase order updated", body = purchase_order::Model),
        (status = 400, description = "Invalid request or status transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<i32>,
    AppJson(payload): AppJson<UpdatePurchaseOrderInput>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .update_purchase_order(po_id, payload)
        .await?;
    Ok(success_response(order))
}

/// Record the vendor's acknowledgment of a purchase order
#[utoipa::path(
    post,
    path = "/purchase-orders/{po_id}/acknowledge",
    params(("po_id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Acknowledgment recorded", body = MessageResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn acknowledge_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let acknowledgment = state
        .services
        .purchase_orders
        .acknowledge_purchase_order(po_id)
        .await?;
    info!(
        po_id,
        newly_acknowledged = acknowledgment.newly_acknowledged,
        "Purchase order acknowledgment handled"
    );
    Ok(success_response(MessageResponse::new(ACKNOWLEDGMENT_RECORDED)))
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route(
            "/:po_id",
            get(get_purchase_order).put(update_purchase_order),
        )
        .route("/:po_id/acknowledge", post(acknowledge_purchase_order))
}
