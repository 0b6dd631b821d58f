//! # Error Types
//!
//! Defines error types shared by the ledger model and its consumers.

use crate::entities::U256;
use thiserror::Error;

/// Errors raised while resolving human-readable addresses.
///
/// These are always recoverable: a consumer that cannot decode one address
/// skips it and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string is empty.
    #[error("Empty address string")]
    Empty,

    /// The string is not valid in the configured encoding.
    #[error("Invalid address encoding for {address:?}: {reason}")]
    InvalidEncoding { address: String, reason: String },

    /// The human-readable prefix does not match the chain's prefix.
    #[error("Invalid address prefix: expected {expected}, got {actual}")]
    WrongPrefix { expected: String, actual: String },

    /// Decoded payload is empty or too long.
    #[error("Invalid address length: {len} bytes")]
    InvalidLength { len: usize },
}

/// Errors raised by balance arithmetic and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    /// Denomination does not satisfy the ledger's naming rule.
    #[error("Invalid denomination: {0:?}")]
    InvalidDenom(String),

    /// Addition exceeded 256 bits.
    #[error("Coin amount overflow")]
    AmountOverflow,

    /// Subtraction would go negative.
    #[error("Insufficient funds: {denom} available {available}, required {required}")]
    InsufficientFunds {
        denom: String,
        available: U256,
        required: U256,
    },
}
