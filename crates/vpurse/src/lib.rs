//! # vpurse
//!
//! Virtual purses: keeps an external controller's mirror of account balances
//! consistent with the ledger, one block at a time.
//!
//! ## Overview
//!
//! At the end of every block the module:
//! - **Scans** the block's events for bank transfers
//! - **Extracts** sender and recipient addresses
//! - **Aggregates** one authoritative post-block balance per distinct address
//! - **Encodes** the address → balance mapping as a deterministic JSON document
//! - **Delivers** it to the controller in a single blocking call
//!
//! ## Pipeline
//!
//! ```text
//! EventManager ──events──→ scanner ──addresses──→ aggregator ──PendingUpdateSet──→ encoder
//!                                                     │                                │
//!                                               BankKeeper (read)                DeliveryPayload
//!                                                                                      │
//!                                                                                      ↓
//!                                                                          ControllerBridge (1 call)
//! ```
//!
//! ## Failure Model
//!
//! | Failure | Handling |
//! |---------|----------|
//! | Undecodable address | `warn!`, address skipped, block continues |
//! | Payload encoding | fatal, `end_block` returns `Err` |
//! | Controller delivery | fatal, `end_block` returns `Err`, no retry |
//!
//! A fatal error must stop block processing on this node: the controller would
//! otherwise diverge from the ledger.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vpurse::{VpurseConfig, VpurseModule};
//! use vpurse::ports::inbound::AppModule;
//!
//! let module = VpurseModule::from_config(&VpurseConfig::from_env(), keeper, controller)?;
//!
//! // after the block's transactions have executed
//! module.end_block(&ctx).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod genesis;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{
    AnyAddressCodec, Bech32AddressCodec, ChannelControllerBridge, ControllerRequest,
    HexAddressCodec, InMemoryBankKeeper, MockControllerBridge,
};
pub use config::{AddressFormat, VpurseConfig};
pub use domain::{
    decode_balance_update, encode_balance_update, AggregationSummary, BalanceAggregator,
    BalanceUpdate, DeliveryPayload, EnsureOutcome, PendingUpdateSet,
};
pub use error::{ControllerError, VpurseError, VpurseResult};
pub use genesis::GenesisState;
pub use ports::inbound::{AppModule, AppModuleBasic, InvariantRegistry};
pub use ports::outbound::{AddressCodec, BankKeeper, ControllerBridge};
pub use service::VpurseModule;

/// Module name, also used as store key and route.
pub const MODULE_NAME: &str = "vpurse";

/// Message routing key.
pub const ROUTER_KEY: &str = MODULE_NAME;

/// Querier routing key.
pub const QUERIER_ROUTE: &str = MODULE_NAME;
