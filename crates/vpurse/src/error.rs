//! Error types for the vpurse module

use thiserror::Error;

/// Failures of the controller delivery primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The controller side of the bridge is gone.
    #[error("Controller channel closed")]
    ChannelClosed,

    /// The request was accepted but no reply ever came back.
    #[error("Controller dropped the request without replying")]
    NoReply,

    /// The controller answered with an error.
    #[error("Controller rejected update: {0}")]
    Rejected(String),
}

impl ControllerError {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChannelClosed => "channel_closed",
            Self::NoReply => "no_reply",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// vpurse module errors
#[derive(Debug, Error)]
pub enum VpurseError {
    /// Balance update could not be serialized. Internal invariant violation.
    #[error("Failed to encode balance update: {0}")]
    Encoding(String),

    /// A balance update document could not be parsed.
    #[error("Failed to decode balance update: {0}")]
    Decoding(String),

    /// The controller did not acknowledge the block's update.
    #[error("Balance update delivery failed at block {block_height}: {source}")]
    Delivery {
        block_height: u64,
        #[source]
        source: ControllerError,
    },

    /// Genesis document is malformed.
    #[error("Invalid genesis state: {0}")]
    InvalidGenesis(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl VpurseError {
    /// True when block processing must halt on this node.
    ///
    /// Encoding and delivery failures leave the controller behind the ledger;
    /// continuing would let the two diverge.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::Delivery { .. })
    }
}

/// Result type for vpurse operations
pub type VpurseResult<T> = Result<T, VpurseError>;
