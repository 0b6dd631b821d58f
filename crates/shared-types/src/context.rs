//! # Block Context
//!
//! The per-block execution context handed to modules by the host framework.

use crate::events::EventManager;
use serde::{Deserialize, Serialize};

/// Header fields a module may read during block processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Chain identifier, e.g. `agoric-3`.
    pub chain_id: String,
    /// Block height.
    pub height: u64,
    /// Block time, Unix seconds.
    pub time: u64,
}

/// Execution context for one block.
///
/// Created by the host before the block's transactions run and dropped after
/// finalization. Nothing here outlives the block.
#[derive(Debug, Clone, Default)]
pub struct BlockContext {
    header: BlockHeader,
    event_manager: EventManager,
}

impl BlockContext {
    pub fn new(header: BlockHeader) -> Self {
        Self {
            header,
            event_manager: EventManager::new(),
        }
    }

    /// Shorthand used heavily in tests.
    pub fn at_height(chain_id: &str, height: u64) -> Self {
        Self::new(BlockHeader {
            chain_id: chain_id.to_string(),
            height,
            time: 0,
        })
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn chain_id(&self) -> &str {
        &self.header.chain_id
    }

    pub fn event_manager(&self) -> &EventManager {
        &self.event_manager
    }

    pub fn event_manager_mut(&mut self) -> &mut EventManager {
        &mut self.event_manager
    }
}

/// A validator power change returned from end-of-block processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    /// Validator consensus public key.
    pub pub_key: Vec<u8>,
    /// New voting power; zero removes the validator.
    pub power: i64,
}
