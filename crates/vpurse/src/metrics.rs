//! # vpurse Metrics
//!
//! Prometheus metrics for the end-of-block balance pipeline.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! vpurse = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `vpurse_blocks_processed_total` - Counter of end_block runs
//! - `vpurse_transfer_events_total` - Counter of transfer events scanned
//! - `vpurse_balance_queries_total` - Counter of bank keeper balance queries
//! - `vpurse_skipped_addresses_total` - Counter of undecodable addresses
//! - `vpurse_deliveries_total` - Counter of acknowledged controller deliveries
//! - `vpurse_delivery_failures_total` - Counter of failed deliveries (by reason)
//! - `vpurse_last_update_addresses` - Gauge of addresses in the last delivered update

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_gauge, register_int_counter, CounterVec, Gauge, IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total end_block runs
    pub static ref BLOCKS_PROCESSED: IntCounter = register_int_counter!(
        "vpurse_blocks_processed_total",
        "Total number of blocks processed by vpurse"
    )
    .expect("Failed to create BLOCKS_PROCESSED metric");

    /// Total transfer events scanned
    pub static ref TRANSFER_EVENTS: IntCounter = register_int_counter!(
        "vpurse_transfer_events_total",
        "Total number of transfer events scanned"
    )
    .expect("Failed to create TRANSFER_EVENTS metric");

    /// Total balance queries issued
    pub static ref BALANCE_QUERIES: IntCounter = register_int_counter!(
        "vpurse_balance_queries_total",
        "Total number of bank balance queries"
    )
    .expect("Failed to create BALANCE_QUERIES metric");

    /// Total addresses skipped as undecodable
    pub static ref SKIPPED_ADDRESSES: IntCounter = register_int_counter!(
        "vpurse_skipped_addresses_total",
        "Total number of transfer addresses that could not be decoded"
    )
    .expect("Failed to create SKIPPED_ADDRESSES metric");

    /// Total acknowledged deliveries
    pub static ref DELIVERIES: IntCounter = register_int_counter!(
        "vpurse_deliveries_total",
        "Total number of balance updates acknowledged by the controller"
    )
    .expect("Failed to create DELIVERIES metric");

    /// Total failed deliveries, labeled by reason
    pub static ref DELIVERY_FAILURES: CounterVec = register_counter_vec!(
        "vpurse_delivery_failures_total",
        "Total number of balance update deliveries that failed",
        &["reason"]
    )
    .expect("Failed to create DELIVERY_FAILURES metric");

    /// Addresses in the last delivered update
    pub static ref LAST_UPDATE_ADDRESSES: Gauge = register_gauge!(
        "vpurse_last_update_addresses",
        "Number of addresses in the last delivered balance update"
    )
    .expect("Failed to create LAST_UPDATE_ADDRESSES metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record one end_block run
#[cfg(feature = "metrics")]
pub fn record_block_processed() {
    BLOCKS_PROCESSED.inc();
}

/// Record transfer events scanned
#[cfg(feature = "metrics")]
pub fn record_transfer_events(count: u64) {
    TRANSFER_EVENTS.inc_by(count);
}

/// Record balance queries issued
#[cfg(feature = "metrics")]
pub fn record_balance_queries(count: u64) {
    BALANCE_QUERIES.inc_by(count);
}

/// Record addresses skipped
#[cfg(feature = "metrics")]
pub fn record_skipped_addresses(count: u64) {
    SKIPPED_ADDRESSES.inc_by(count);
}

/// Record an acknowledged delivery
#[cfg(feature = "metrics")]
pub fn record_delivery() {
    DELIVERIES.inc();
}

/// Record a failed delivery with reason
#[cfg(feature = "metrics")]
pub fn record_delivery_failure(reason: &str) {
    DELIVERY_FAILURES.with_label_values(&[reason]).inc();
}

/// Update last update size gauge
#[cfg(feature = "metrics")]
pub fn set_last_update_size(addresses: usize) {
    LAST_UPDATE_ADDRESSES.set(addresses as f64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_block_processed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_transfer_events(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_balance_queries(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_skipped_addresses(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_delivery() {}

#[cfg(not(feature = "metrics"))]
pub fn record_delivery_failure(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_last_update_size(_addresses: usize) {}
