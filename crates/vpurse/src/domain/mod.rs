//! Domain layer for the vpurse module
//!
//! The per-block pipeline, one stage per file:
//! - `scanner`: transfer event selection and address extraction
//! - `aggregator`: deduplicated balance collection
//! - `encoder`: controller payload (de)serialization

pub mod aggregator;
pub mod encoder;
pub mod scanner;

pub use aggregator::{AggregationSummary, BalanceAggregator, EnsureOutcome, PendingUpdateSet};
pub use encoder::{decode_balance_update, encode_balance_update, BalanceUpdate, DeliveryPayload};
pub use scanner::{extract_addresses, scan_transfer_events, transfer_parties};
