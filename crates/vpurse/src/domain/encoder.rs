//! Balance update encoding
//!
//! Wire format delivered to the controller, one document per block:
//!
//! ```json
//! {
//!   "agoric1...a": [{"denom": "ubld", "amount": "90"}],
//!   "agoric1...b": [{"denom": "ubld", "amount": "110"}, {"denom": "urun", "amount": "3"}]
//! }
//! ```
//!
//! Keys are sorted, coins are sorted by denomination and amounts are decimal
//! strings, so every node produces byte-identical payloads for the same block.

use super::aggregator::PendingUpdateSet;
use crate::error::{VpurseError, VpurseResult};
use shared_types::{Coin, Coins};
use std::collections::BTreeMap;
use std::fmt;

/// Decoded form of a delivery payload.
pub type BalanceUpdate = BTreeMap<String, Coins>;

/// Opaque bytes handed to the controller.
#[derive(Clone, PartialEq, Eq)]
pub struct DeliveryPayload(Vec<u8>);

impl DeliveryPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DeliveryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeliveryPayload({})", String::from_utf8_lossy(&self.0))
    }
}

/// Serialize a block's pending updates.
///
/// Returns `Ok(None)` when there is nothing to deliver, so a block without
/// transfers costs no controller round trip.
pub fn encode_balance_update(pending: &PendingUpdateSet) -> VpurseResult<Option<DeliveryPayload>> {
    if pending.is_empty() {
        return Ok(None);
    }
    serde_json::to_vec(pending.entries())
        .map(|bytes| Some(DeliveryPayload(bytes)))
        .map_err(|e| VpurseError::Encoding(e.to_string()))
}

/// Parse a payload back into balances.
///
/// Coins are re-normalized so a hand-written document with unsorted or
/// duplicated denominations still compares equal to the ledger's view.
pub fn decode_balance_update(bytes: &[u8]) -> VpurseResult<BalanceUpdate> {
    let raw: BTreeMap<String, Vec<Coin>> =
        serde_json::from_slice(bytes).map_err(|e| VpurseError::Decoding(e.to_string()))?;

    raw.into_iter()
        .map(|(address, coins)| {
            Coins::from_coins(coins)
                .map(|balance| (address, balance))
                .map_err(|e| VpurseError::Decoding(e.to_string()))
        })
        .collect()
}
