use crate::{
    db::DbPool,
    entities::{purchase_order, vendor, PurchaseOrderStatus},
    errors::ServiceError,
    services::recalculation::MetricsRecalculator,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

fn empty_items() -> JsonValue {
    JsonValue::Array(Vec::new())
}

// Keeps an explicit `null` apart from an absent field: absent stays `None`,
// `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePurchaseOrderInput {
    #[validate(length(min = 1, max = 50, message = "PO number must be between 1 and 50 characters"))]
    pub po_number: String,
    pub vendor_id: i32,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    #[serde(default = "empty_items")]
    #[schema(value_type = Object)]
    pub items: JsonValue,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
    #[serde(default)]
    pub status: PurchaseOrderStatus,
    #[validate(range(min = 0.0, max = 5.0, message = "Quality rating must be between 0 and 5"))]
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    /// Only for orders imported with an acknowledgment already on record
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Partial update of a purchase order. The owning vendor and the
/// acknowledgment date cannot be changed here.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePurchaseOrderInput {
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub items: Option<JsonValue>,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub status: Option<PurchaseOrderStatus>,
    /// Send `null` to clear a recorded rating
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    #[validate(range(min = 0.0, max = 5.0, message = "Quality rating must be between 0 and 5"))]
    pub quality_rating: Option<Option<f64>>,
}

/// Result of an acknowledgment request.
#[derive(Debug, Clone)]
pub struct Acknowledgment {
    pub purchase_order: purchase_order::Model,
    /// False when the order had already been acknowledged
    pub newly_acknowledged: bool,
}

/// Purchase order mutations. Every mutation ends with a metrics
/// recalculation for the owning vendor inside the same transaction.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
    recalculator: Arc<MetricsRecalculator>,
}

impl PurchaseOrderService {
    pub fn new(db_pool: Arc<DbPool>, recalculator: Arc<MetricsRecalculator>) -> Self {
        Self {
            db_pool,
            recalculator,
        }
    }

    #[instrument(skip(self, input), fields(po_number = %input.po_number, vendor_id = input.vendor_id))]
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        input.validate()?;
        let vendor_id = input.vendor_id;

        let _guard = self.recalculator.lock_vendor(vendor_id).await;
        let txn = self.db_pool.begin().await?;

        if vendor::Entity::find_by_id(vendor_id).one(&txn).await?.is_none() {
            return Err(ServiceError::vendor_not_found(vendor_id));
        }

        let duplicate = purchase_order::Entity::find()
            .filter(purchase_order::Column::PoNumber.eq(input.po_number.as_str()))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Purchase order number {} already exists",
                input.po_number
            )));
        }

        let created = purchase_order::ActiveModel {
            id: NotSet,
            po_number: Set(input.po_number),
            vendor_id: Set(vendor_id),
            order_date: Set(input.order_date),
            delivery_date: Set(input.delivery_date),
            items: Set(input.items),
            quantity: Set(input.quantity),
            status: Set(input.status),
            quality_rating: Set(input.quality_rating),
            issue_date: Set(input.issue_date),
            acknowledgment_date: Set(input.acknowledgment_date),
        }
        .insert(&txn)
        .await?;

        self.recalculator.recalculate_in(&txn, vendor_id).await?;
        txn.commit().await?;

        info!(po_id = created.id, status = %created.status, "purchase order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_purchase_order(&self, po_id: i32) -> Result<purchase_order::Model, ServiceError> {
        find_purchase_order(&*self.db_pool, po_id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_purchase_order(
        &self,
        po_id: i32,
        input: UpdatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        input.validate()?;
        let vendor_id = self.get_purchase_order(po_id).await?.vendor_id;

        let _guard = self.recalculator.lock_vendor(vendor_id).await;
        let txn = self.db_pool.begin().await?;
        let current = find_purchase_order(&txn, po_id).await?;

        if let Some(next) = input.status {
            if !current.status.can_transition_to(next) {
                return Err(ServiceError::InvalidOperation(format!(
                    "Purchase order {} cannot move from {} to {}",
                    po_id, current.status, next
                )));
            }
        }

        let previous_status = current.status;
        let mut active: purchase_order::ActiveModel = current.clone().into();
        if let Some(order_date) = input.order_date {
            active.order_date = Set(order_date);
        }
        if let Some(delivery_date) = input.delivery_date {
            active.delivery_date = Set(delivery_date);
        }
        if let Some(items) = input.items {
            active.items = Set(items);
        }
        if let Some(quantity) = input.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(quality_rating) = input.quality_rating {
            active.quality_rating = Set(quality_rating);
        }

        let updated = if active.is_changed() {
            active.update(&txn).await?
        } else {
            current
        };

        self.recalculator.recalculate_in(&txn, vendor_id).await?;
        txn.commit().await?;

        if previous_status != updated.status {
            info!(po_id, from = %previous_status, to = %updated.status, "purchase order status changed");
        } else {
            info!(po_id, "purchase order updated");
        }
        Ok(updated)
    }

    /// Records the vendor's acknowledgment. The first acknowledgment wins;
    /// later calls leave the stored timestamp untouched.
    #[instrument(skip(self))]
    pub async fn acknowledge_purchase_order(
        &self,
        po_id: i32,
    ) -> Result<Acknowledgment, ServiceError> {
        let vendor_id = self.get_purchase_order(po_id).await?.vendor_id;

        let _guard = self.recalculator.lock_vendor(vendor_id).await;
        let txn = self.db_pool.begin().await?;
        let current = find_purchase_order(&txn, po_id).await?;

        let (purchase_order, newly_acknowledged) = if current.acknowledgment_date.is_some() {
            (current, false)
        } else {
            let mut active: purchase_order::ActiveModel = current.into();
            active.acknowledgment_date = Set(Some(Utc::now()));
            (active.update(&txn).await?, true)
        };

        self.recalculator.recalculate_in(&txn, vendor_id).await?;
        txn.commit().await?;

        if newly_acknowledged {
            info!(po_id, vendor_id, "purchase order acknowledged");
        } else {
            info!(po_id, vendor_id, "purchase order was already acknowledged");
        }

        Ok(Acknowledgment {
            purchase_order,
            newly_acknowledged,
        })
    }
}

async fn find_purchase_order<C: ConnectionTrait>(
    conn: &C,
    po_id: i32,
) -> Result<purchase_order::Model, ServiceError> {
    purchase_order::Entity::find_by_id(po_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::purchase_order_not_found(po_id))
}
