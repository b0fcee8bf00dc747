use crate::{
    db::DbPool,
    entities::{historical_performance, purchase_order, vendor},
    errors::ServiceError,
    services::{
        recalculation::{load_vendor_orders, MetricsRecalculator},
        vendor_metrics::{compute_vendor_metrics, VendorMetrics},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, NotSet, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Input for registering a vendor. Metric fields are not accepted: they start
/// at zero and are owned by the recalculation service.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateVendorInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Contact details are required"))]
    pub contact_details: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "Vendor code must be between 1 and 50 characters"
    ))]
    pub vendor_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateVendorInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Contact details must not be empty"))]
    pub contact_details: Option<String>,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,
}

/// Vendor records plus the read side of vendor performance.
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    recalculator: Arc<MetricsRecalculator>,
}

impl VendorService {
    pub fn new(db_pool: Arc<DbPool>, recalculator: Arc<MetricsRecalculator>) -> Self {
        Self {
            db_pool,
            recalculator,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_vendor(&self, input: CreateVendorInput) -> Result<vendor::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let existing = vendor::Entity::find()
            .filter(vendor::Column::VendorCode.eq(input.vendor_code.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Vendor code {} is already registered",
                input.vendor_code
            )));
        }

        let created = vendor::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            contact_details: Set(input.contact_details),
            address: Set(input.address),
            vendor_code: Set(input.vendor_code),
            on_time_delivery_rate: Set(0.0),
            quality_rating_avg: Set(0.0),
            average_response_time: Set(0.0),
            fulfillment_rate: Set(0.0),
        }
        .insert(db)
        .await?;

        info!(vendor_id = created.id, vendor_code = %created.vendor_code, "vendor created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: i32) -> Result<vendor::Model, ServiceError> {
        vendor::Entity::find_by_id(vendor_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::vendor_not_found(vendor_id))
    }

    #[instrument(skip(self))]
    pub async fn update_vendor(
        &self,
        vendor_id: i32,
        input: UpdateVendorInput,
    ) -> Result<vendor::Model, ServiceError> {
        input.validate()?;
        let vendor = self.get_vendor(vendor_id).await?;

        let mut active: vendor::ActiveModel = vendor.clone().into();
        let mut changed = false;
        if let Some(name) = input.name {
            active.name = Set(name);
            changed = true;
        }
        if let Some(contact_details) = input.contact_details {
            active.contact_details = Set(contact_details);
            changed = true;
        }
        if let Some(address) = input.address {
            active.address = Set(address);
            changed = true;
        }
        if !changed {
            return Ok(vendor);
        }

        let updated = active.update(&*self.db_pool).await?;
        info!(vendor_id, "vendor updated");
        Ok(updated)
    }

    /// Removes the vendor together with its orders and history.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: i32) -> Result<(), ServiceError> {
        let _guard = self.recalculator.lock_vendor(vendor_id).await;
        let txn = self.db_pool.begin().await?;
        let vendor = vendor::Entity::find_by_id(vendor_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::vendor_not_found(vendor_id))?;

        // Children go first so the cascade holds even where the backend does
        // not enforce foreign keys.
        historical_performance::Entity::delete_many()
            .filter(historical_performance::Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        purchase_order::Entity::delete_many()
            .filter(purchase_order::Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        vendor.delete(&txn).await?;
        txn.commit().await?;

        info!(vendor_id, "vendor deleted");
        Ok(())
    }

    /// Computes the vendor's metrics from its current orders. The cached
    /// columns on the vendor row are not consulted.
    #[instrument(skip(self))]
    pub async fn vendor_performance(&self, vendor_id: i32) -> Result<VendorMetrics, ServiceError> {
        self.get_vendor(vendor_id).await?;
        let orders = load_vendor_orders(&*self.db_pool, vendor_id).await?;
        Ok(compute_vendor_metrics(&orders))
    }

    /// Snapshots recorded for the vendor, newest first.
    #[instrument(skip(self))]
    pub async fn performance_history(
        &self,
        vendor_id: i32,
    ) -> Result<Vec<historical_performance::Model>, ServiceError> {
        self.get_vendor(vendor_id).await?;
        let history = historical_performance::Entity::find()
            .filter(historical_performance::Column::VendorId.eq(vendor_id))
            .order_by_desc(historical_performance::Column::Date)
            .order_by_desc(historical_performance::Column::Id)
            .all(&*self.db_pool)
            .await?;
        Ok(history)
    }
}
