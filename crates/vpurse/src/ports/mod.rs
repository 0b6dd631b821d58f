//! Ports module for the vpurse module
//!
//! - `inbound`: the module interface the host framework drives
//! - `outbound`: ledger state, address codec and controller dependencies

pub mod inbound;
pub mod outbound;

pub use inbound::{AppModule, AppModuleBasic, InvariantRegistry};
pub use outbound::{AddressCodec, BankKeeper, ControllerBridge};
