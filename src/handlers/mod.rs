pub mod common;
pub mod purchase_orders;
pub mod vendors;

use crate::{
    db::DbPool,
    services::{
        purchase_orders::PurchaseOrderService, recalculation::MetricsRecalculator,
        vendors::VendorService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub vendors: Arc<VendorService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
    pub recalculator: Arc<MetricsRecalculator>,
}

impl AppServices {
    /// Wires every service around one shared recalculator so that all
    /// mutations see the same per-vendor locks.
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        let recalculator = Arc::new(MetricsRecalculator::new(db_pool.clone()));
        let vendors = Arc::new(VendorService::new(db_pool.clone(), recalculator.clone()));
        let purchase_orders = Arc::new(PurchaseOrderService::new(db_pool, recalculator.clone()));

        Self {
            vendors,
            purchase_orders,
            recalculator,
        }
    }
}
