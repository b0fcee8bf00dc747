//! Recomputes and persists a vendor's cached metrics.
//!
//! Recalculation always starts from the vendor's full order set; the cached
//! columns on `vendors` are overwritten, never adjusted. Callers that mutate
//! purchase orders hold the vendor lock from before their transaction begins
//! until after it commits, and call [`MetricsRecalculator::recalculate_in`]
//! on that transaction as their last step.

use crate::{
    db::DbPool,
    entities::{historical_performance, purchase_order, vendor},
    errors::ServiceError,
    services::vendor_metrics::{compute_vendor_metrics, VendorMetrics},
};
use chrono::Utc;
use dashmap::DashMap;
use metrics::{counter, histogram};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

type LockMap = DashMap<i32, Arc<Mutex<()>>>;

/// One async mutex per vendor id. An entry lives only while some task holds
/// or waits for it.
#[derive(Debug, Default)]
pub struct VendorLocks {
    locks: Arc<LockMap>,
}

impl VendorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other recalculation for `vendor_id` is in flight.
    pub async fn acquire(&self, vendor_id: i32) -> VendorLockGuard {
        let lock = self.locks.entry(vendor_id).or_default().clone();
        let guard = lock.lock_owned().await;
        VendorLockGuard {
            vendor_id,
            guard: Some(guard),
            locks: self.locks.clone(),
        }
    }

    /// Number of vendor ids that currently have a mutex.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Holds a vendor's mutex. Dropping the last holder removes the map entry.
#[derive(Debug)]
pub struct VendorLockGuard {
    vendor_id: i32,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl Drop for VendorLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The map's own clone is the only one left when nobody waits.
        self.locks
            .remove_if(&self.vendor_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Loads every order of a vendor in a stable order (by id).
pub async fn load_vendor_orders<C: ConnectionTrait>(
    conn: &C,
    vendor_id: i32,
) -> Result<Vec<purchase_order::Model>, DbErr> {
    purchase_order::Entity::find()
        .filter(purchase_order::Column::VendorId.eq(vendor_id))
        .order_by_asc(purchase_order::Column::Id)
        .all(conn)
        .await
}

#[derive(Debug, Clone)]
pub struct MetricsRecalculator {
    db_pool: Arc<DbPool>,
    locks: Arc<VendorLocks>,
}

impl MetricsRecalculator {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            locks: Arc::new(VendorLocks::new()),
        }
    }

    pub async fn lock_vendor(&self, vendor_id: i32) -> VendorLockGuard {
        self.locks.acquire(vendor_id).await
    }

    /// Vendor ids with a live mutex; zero when no mutation is in flight.
    pub fn active_vendor_locks(&self) -> usize {
        self.locks.len()
    }

    /// Recomputes the vendor's metrics on `conn`, writes them onto the vendor
    /// row and appends a history snapshot. The caller must hold the vendor
    /// lock and owns the commit.
    #[instrument(skip(self, conn))]
    pub async fn recalculate_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        vendor_id: i32,
    ) -> Result<VendorMetrics, ServiceError> {
        let start = Instant::now();

        let vendor = vendor::Entity::find_by_id(vendor_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::vendor_not_found(vendor_id))?;

        let orders = load_vendor_orders(conn, vendor_id).await?;
        let metrics = compute_vendor_metrics(&orders);
        debug!(vendor_id, order_count = orders.len(), "computed vendor metrics");

        let mut active: vendor::ActiveModel = vendor.into();
        active.on_time_delivery_rate = Set(metrics.on_time_delivery_rate);
        active.quality_rating_avg = Set(metrics.quality_rating_avg);
        active.average_response_time = Set(metrics.average_response_time);
        active.fulfillment_rate = Set(metrics.fulfillment_rate);
        active.update(conn).await?;

        historical_performance::ActiveModel {
            id: NotSet,
            vendor_id: Set(vendor_id),
            date: Set(Utc::now()),
            on_time_delivery_rate: Set(metrics.on_time_delivery_rate),
            quality_rating_avg: Set(metrics.quality_rating_avg),
            average_response_time: Set(metrics.average_response_time),
            fulfillment_rate: Set(metrics.fulfillment_rate),
        }
        .insert(conn)
        .await?;

        counter!("vendor_metrics.recalculations", 1);
        histogram!(
            "vendor_metrics.recalculation_seconds",
            start.elapsed().as_secs_f64()
        );
        info!(
            vendor_id,
            on_time_delivery_rate = metrics.on_time_delivery_rate,
            quality_rating_avg = metrics.quality_rating_avg,
            average_response_time = metrics.average_response_time,
            fulfillment_rate = metrics.fulfillment_rate,
            "vendor metrics recalculated"
        );

        Ok(metrics)
    }

    /// Locks the vendor and recalculates in a transaction of its own.
    #[instrument(skip(self))]
    pub async fn recalculate(&self, vendor_id: i32) -> Result<VendorMetrics, ServiceError> {
        let _guard = self.lock_vendor(vendor_id).await;
        let txn = self.db_pool.begin().await?;
        let metrics = self.recalculate_in(&txn, vendor_id).await?;
        txn.commit().await?;
        Ok(metrics)
    }

    /// Full reconciliation pass over every vendor. Returns how many vendors
    /// were recalculated; a vendor deleted mid-pass is skipped.
    #[instrument(skip(self))]
    pub async fn reconcile_all(&self) -> Result<usize, ServiceError> {
        let vendor_ids: Vec<i32> = vendor::Entity::find()
            .order_by_asc(vendor::Column::Id)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(|vendor| vendor.id)
            .collect();

        let mut recalculated = 0;
        for vendor_id in vendor_ids {
            match self.recalculate(vendor_id).await {
                Ok(_) => recalculated += 1,
                Err(ServiceError::NotFound(_)) => {
                    warn!(vendor_id, "vendor disappeared during reconciliation");
                }
                Err(err) => return Err(err),
            }
        }

        info!(recalculated, "vendor metrics reconciliation finished");
        Ok(recalculated)
    }
}
