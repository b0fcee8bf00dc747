use super::common::{created_response, no_content_response, success_response, AppJson};
use crate::{
    entities::{historical_performance, vendor},
    errors::ApiError,
    handlers::AppState,
    services::{
        vendor_metrics::VendorMetrics,
        vendors::{CreateVendorInput, UpdateVendorInput},
    },
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

/// Performance metrics as exposed over HTTP. The fulfilment key keeps the
/// British spelling that existing clients read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VendorPerformanceResponse {
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    #[serde(rename = "fulfilment_rate")]
    pub fulfillment_rate: f64,
}

impl From<VendorMetrics> for VendorPerformanceResponse {
    fn from(metrics: VendorMetrics) -> Self {
        Self {
            on_time_delivery_rate: metrics.on_time_delivery_rate,
            quality_rating_avg: metrics.quality_rating_avg,
            average_response_time: metrics.average_response_time,
            fulfillment_rate: metrics.fulfillment_rate,
        }
    }
}

/// Register a vendor
#[utoipa::path(
    post,
    path = "/vendors",
    request_body = CreateVendorInput,
    responses(
        (status = 201, description = "Vendor created", body = vendor::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Vendor code already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateVendorInput>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state.services.vendors.create_vendor(payload).await?;
    info!(vendor_id = vendor.id, "Vendor registered");
    Ok(created_response(vendor))
}

/// Get a vendor with its cached metrics
#[utoipa::path(
    get,
    path = "/vendors/{vendor_id}",
    params(("vendor_id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor found", body = vendor::Model),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state.services.vendors.get_vendor(vendor_id).await?;
    Ok(success_response(vendor))
}

/// Update a vendor's identity fields
#[utoipa::path(
    put,
    path = "/vendors/{vendor_id}",
    params(("vendor_id" = i32, Path, description = "Vendor ID")),
    request_body = UpdateVendorInput,
    responses(
        (status = 200, description = "Vendor updated", body = vendor::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<i32>,
    AppJson(payload): AppJson<UpdateVendorInput>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .update_vendor(vendor_id, payload)
        .await?;
    Ok(success_response(vendor))
}

/// Delete a vendor along with its purchase orders and history
#[utoipa::path(
    delete,
    path = "/vendors/{vendor_id}",
    params(("vendor_id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.vendors.delete_vendor(vendor_id).await?;
    info!(vendor_id, "Vendor removed");
    Ok(no_content_response())
}

/// Current performance metrics, computed from the vendor's orders
#[utoipa::path(
    get,
    path = "/vendors/{vendor_id}/performance",
    params(("vendor_id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor performance", body = VendorPerformanceResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor_performance(
    State(state): State<AppState>,
    Path(vendor_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let metrics = state.services.vendors.vendor_performance(vendor_id).await?;
    Ok(success_response(VendorPerformanceResponse::from(metrics)))
}

/// Performance snapshots, newest first
#[utoipa::path(
    get,
    path = "/vendors/{vendor_id}/history",
    params(("vendor_id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Performance history", body = [historical_performance::Model]),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor_history(
    State(state): State<AppState>,
    Path(vendor_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state
        .services
        .vendors
        .performance_history(vendor_id)
        .await?;
    Ok(success_response(history))
}

pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_vendor))
        .route(
            "/:vendor_id",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
        .route("/:vendor_id/performance", get(get_vendor_performance))
        .route("/:vendor_id/history", get(get_vendor_history))
}
