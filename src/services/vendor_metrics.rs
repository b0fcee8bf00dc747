//! Vendor metrics computation.
//!
//! Everything here is a pure function of a vendor's order set: no database
//! access, no clock. Ratios with an empty denominator resolve to `0.0`.

use crate::entities::purchase_order;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The four aggregate metrics derived from a vendor's purchase orders.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct VendorMetrics {
    /// Percentage of completed orders whose delivery date is on or before the
    /// acknowledgment date
    pub on_time_delivery_rate: f64,
    /// Mean quality rating over rated completed orders
    pub quality_rating_avg: f64,
    /// Mean seconds between issue and acknowledgment over acknowledged
    /// completed orders
    pub average_response_time: f64,
    /// Percentage of all orders that reached `Completed`
    pub fulfillment_rate: f64,
}

/// Computes all four metrics from the full order history of one vendor.
pub fn compute_vendor_metrics(orders: &[purchase_order::Model]) -> VendorMetrics {
    let completed: Vec<&purchase_order::Model> =
        orders.iter().filter(|order| order.is_completed()).collect();

    VendorMetrics {
        on_time_delivery_rate: on_time_delivery_rate(&completed),
        quality_rating_avg: quality_rating_avg(&completed),
        average_response_time: average_response_time(&completed),
        fulfillment_rate: percentage(completed.len(), orders.len()),
    }
}

/// Unacknowledged orders stay in the denominator but never count as on time.
pub fn on_time_delivery_rate(completed: &[&purchase_order::Model]) -> f64 {
    let on_time = completed
        .iter()
        .filter(|order| is_delivered_on_time(order))
        .count();
    percentage(on_time, completed.len())
}

pub fn quality_rating_avg(completed: &[&purchase_order::Model]) -> f64 {
    mean(completed.iter().filter_map(|order| order.quality_rating))
}

pub fn average_response_time(completed: &[&purchase_order::Model]) -> f64 {
    mean(completed.iter().filter_map(|order| response_time_seconds(order)))
}

pub fn is_delivered_on_time(order: &purchase_order::Model) -> bool {
    order
        .acknowledgment_date
        .map_or(false, |acknowledged| order.delivery_date <= acknowledged)
}

/// Full span from issue to acknowledgment in seconds, sub-second part kept.
pub fn response_time_seconds(order: &purchase_order::Model) -> Option<f64> {
    let acknowledged = order.acknowledgment_date?;
    let span = acknowledged.signed_duration_since(order.issue_date);
    Some(span.num_seconds() as f64 + f64::from(span.subsec_nanos()) / 1_000_000_000.0)
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
