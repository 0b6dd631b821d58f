//! vpurse Service - end-of-block pipeline
//!
//! Wires the domain stages to the outbound ports and exposes the result
//! through the `AppModule` lifecycle.

use crate::adapters::AnyAddressCodec;
use crate::config::VpurseConfig;
use crate::domain::{
    encode_balance_update, scan_transfer_events, transfer_parties, AggregationSummary,
    BalanceAggregator, PendingUpdateSet,
};
use crate::error::{VpurseError, VpurseResult};
use crate::genesis::{self, GenesisState};
use crate::metrics;
use crate::ports::inbound::{AppModule, AppModuleBasic, InvariantRegistry};
use crate::ports::outbound::{AddressCodec, BankKeeper, ControllerBridge};
use crate::{MODULE_NAME, QUERIER_ROUTE};
use async_trait::async_trait;
use shared_types::{BlockContext, ValidatorUpdate};
use std::sync::Arc;
use tracing::{debug, Instrument};
use vpurse_telemetry::{log_block_event, module_span};

/// The vpurse module.
///
/// Holds no per-block state: every `end_block` builds a fresh
/// [`PendingUpdateSet`] and discards it once delivered.
pub struct VpurseModule<K, C, A = AnyAddressCodec>
where
    K: BankKeeper,
    C: ControllerBridge,
    A: AddressCodec,
{
    keeper: Arc<K>,
    controller: Arc<C>,
    codec: A,
}

impl<K, C> VpurseModule<K, C, AnyAddressCodec>
where
    K: BankKeeper,
    C: ControllerBridge,
{
    /// Build the module with the codec selected by `config`.
    pub fn from_config(
        config: &VpurseConfig,
        keeper: Arc<K>,
        controller: Arc<C>,
    ) -> VpurseResult<Self> {
        let codec = config.address_codec()?;
        Ok(Self::new(keeper, controller, codec))
    }
}

impl<K, C, A> VpurseModule<K, C, A>
where
    K: BankKeeper,
    C: ControllerBridge,
    A: AddressCodec,
{
    pub fn new(keeper: Arc<K>, controller: Arc<C>, codec: A) -> Self {
        Self {
            keeper,
            controller,
            codec,
        }
    }

    pub fn codec(&self) -> &A {
        &self.codec
    }

    /// Scan the block's events and read one balance per distinct party.
    ///
    /// Reads state only. Safe to call repeatedly within a block.
    pub fn collect_balance_updates(
        &self,
        ctx: &BlockContext,
    ) -> (PendingUpdateSet, AggregationSummary) {
        let events = ctx.event_manager().event_history();
        let transfers = scan_transfer_events(events).count();
        metrics::record_transfer_events(transfers as u64);

        let mut aggregator = BalanceAggregator::new(ctx, self.keeper.as_ref(), &self.codec);
        aggregator.extend(transfer_parties(events));
        let (pending, summary) = aggregator.finish();

        metrics::record_balance_queries(summary.balance_queries as u64);
        metrics::record_skipped_addresses(summary.skipped as u64);
        debug!(
            block_height = ctx.block_height(),
            transfers,
            addresses_seen = summary.addresses_seen,
            balance_queries = summary.balance_queries,
            skipped = summary.skipped,
            "Collected vpurse balances"
        );
        (pending, summary)
    }

    async fn process_block(&self, ctx: &BlockContext) -> VpurseResult<()> {
        metrics::record_block_processed();

        let (pending, _) = self.collect_balance_updates(ctx);
        let payload = match encode_balance_update(&pending) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(()),
            Err(err) => {
                log_block_event!(
                    error,
                    MODULE_NAME,
                    "Cannot encode vpurse balance update",
                    ctx.block_height(),
                    error = %err
                );
                return Err(err);
            }
        };

        // Single attempt, no retry.
        match self.controller.call_to_controller(ctx, &payload).await {
            Ok(_) => {
                metrics::record_delivery();
                metrics::set_last_update_size(pending.len());
                log_block_event!(
                    info,
                    MODULE_NAME,
                    "Delivered vpurse balance update",
                    ctx.block_height(),
                    addresses = pending.len(),
                    bytes = payload.len()
                );
                Ok(())
            }
            Err(source) => {
                metrics::record_delivery_failure(source.label());
                log_block_event!(
                    error,
                    MODULE_NAME,
                    "Cannot update vpurse balances",
                    ctx.block_height(),
                    addresses = pending.len(),
                    error = %source
                );
                Err(VpurseError::Delivery {
                    block_height: ctx.block_height(),
                    source,
                })
            }
        }
    }
}

impl<K, C, A> AppModuleBasic for VpurseModule<K, C, A>
where
    K: BankKeeper,
    C: ControllerBridge,
    A: AddressCodec,
{
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn default_genesis(&self) -> VpurseResult<Vec<u8>> {
        genesis::default_genesis().to_json()
    }

    fn validate_genesis(&self, bz: &[u8]) -> VpurseResult<()> {
        GenesisState::from_json(bz)?.validate()
    }
}

#[async_trait]
impl<K, C, A> AppModule for VpurseModule<K, C, A>
where
    K: BankKeeper,
    C: ControllerBridge,
    A: AddressCodec,
{
    fn querier_route(&self) -> &'static str {
        QUERIER_ROUTE
    }

    fn register_invariants(&self, _registry: &mut InvariantRegistry) {}

    async fn begin_block(&self, _ctx: &BlockContext) {}

    async fn end_block(&self, ctx: &BlockContext) -> VpurseResult<Vec<ValidatorUpdate>> {
        let span = module_span!(
            "end_block",
            module = MODULE_NAME,
            block_height = ctx.block_height()
        );
        self.process_block(ctx).instrument(span).await?;
        Ok(Vec::new())
    }

    fn init_genesis(&self, ctx: &BlockContext, bz: &[u8]) -> VpurseResult<Vec<ValidatorUpdate>> {
        let state = GenesisState::from_json(bz)?;
        genesis::init_genesis(ctx, &state)
    }

    fn export_genesis(&self, ctx: &BlockContext) -> VpurseResult<Vec<u8>> {
        genesis::export_genesis(ctx).to_json()
    }
}
