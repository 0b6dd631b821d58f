//! Driven Ports (SPI - Outbound Dependencies)

use crate::domain::DeliveryPayload;
use crate::error::ControllerError;
use async_trait::async_trait;
use shared_types::{AccAddress, AddressError, BlockContext, Coins};

/// Resolves human-readable addresses to ledger account identifiers.
///
/// Must be pure: the same input yields the same result on every node.
pub trait AddressCodec: Send + Sync {
    /// Parse an address string.
    fn decode(&self, address: &str) -> Result<AccAddress, AddressError>;

    /// Render the canonical string form of an address.
    fn encode(&self, address: &AccAddress) -> Result<String, AddressError>;
}

/// Read access to ledger balances.
///
/// The pipeline never writes through this port.
pub trait BankKeeper: Send + Sync {
    /// Every non-zero holding of `address` as of the current state of `ctx`.
    fn get_all_balances(&self, ctx: &BlockContext, address: &AccAddress) -> Coins;
}

/// Delivery channel to the controller process.
///
/// A call resolves only once the controller has acknowledged or refused the
/// payload. There is no timeout: block finalization waits.
#[async_trait]
pub trait ControllerBridge: Send + Sync {
    /// Deliver one block's balance update and wait for the reply.
    async fn call_to_controller(
        &self,
        ctx: &BlockContext,
        payload: &DeliveryPayload,
    ) -> Result<Vec<u8>, ControllerError>;
}
