// Pure metric computation
pub mod vendor_metrics;

// Per-vendor recomputation and reconciliation
pub mod recalculation;

// Entity services
pub mod purchase_orders;
pub mod vendors;
