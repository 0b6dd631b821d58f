//! Transfer event scanning
//!
//! Selects the block's `transfer` events and pulls out the addresses named in
//! them. Amounts are ignored on purpose: balances are re-read from state
//! rather than reconstructed from event deltas.

use shared_types::{Event, EventKind};
use std::borrow::Cow;

/// Transfer events, in emission order.
pub fn scan_transfer_events(events: &[Event]) -> impl Iterator<Item = &Event> {
    events
        .iter()
        .filter(|event| matches!(event.kind(), EventKind::Transfer))
}

/// Sender and recipient address strings of one event.
pub fn extract_addresses(event: &Event) -> impl Iterator<Item = Cow<'_, str>> {
    event
        .attributes()
        .iter()
        .filter(|attr| attr.key.is_party())
        .map(|attr| attr.value_str())
}

/// Every party of every transfer in `events`. Duplicates are kept.
pub fn transfer_parties(events: &[Event]) -> impl Iterator<Item = Cow<'_, str>> {
    scan_transfer_events(events).flat_map(extract_addresses)
}
