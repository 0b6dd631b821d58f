//! Genesis state
//!
//! The module keeps no state of its own; balances live in the bank module and
//! the controller rebuilds its mirror from per-block updates. Genesis is
//! therefore an empty document that must still parse strictly.

use crate::error::{VpurseError, VpurseResult};
use serde::{Deserialize, Serialize};
use shared_types::{BlockContext, ValidatorUpdate};
use tracing::info;

/// vpurse genesis state. Serialized as `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisState {}

impl GenesisState {
    pub fn validate(&self) -> VpurseResult<()> {
        Ok(())
    }

    pub fn from_json(bz: &[u8]) -> VpurseResult<Self> {
        serde_json::from_slice(bz).map_err(|e| VpurseError::InvalidGenesis(e.to_string()))
    }

    pub fn to_json(&self) -> VpurseResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| VpurseError::InvalidGenesis(e.to_string()))
    }
}

pub fn default_genesis() -> GenesisState {
    GenesisState::default()
}

/// Apply genesis. Returns no validator updates.
pub fn init_genesis(
    ctx: &BlockContext,
    state: &GenesisState,
) -> VpurseResult<Vec<ValidatorUpdate>> {
    state.validate()?;
    info!(chain_id = %ctx.chain_id(), "vpurse genesis initialized");
    Ok(Vec::new())
}

pub fn export_genesis(_ctx: &BlockContext) -> GenesisState {
    GenesisState::default()
}
