//! Adapters for the vpurse module
//!
//! Implementations of the outbound ports:
//! - `address_codec`: bech32 and hex address codecs
//! - `bank_keeper`: in-memory ledger balances
//! - `controller`: channel and mock controller bridges

pub mod address_codec;
pub mod bank_keeper;
pub mod controller;

pub use address_codec::{AnyAddressCodec, Bech32AddressCodec, HexAddressCodec};
pub use bank_keeper::{InMemoryBankKeeper, SendError};
pub use controller::{
    ChannelControllerBridge, ControllerRequest, MockControllerBridge, RecordedCall,
};
