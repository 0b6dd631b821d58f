//! Driving Ports (API - Inbound)
//!
//! The module interface required by the host's module manager.

use crate::error::VpurseResult;
use async_trait::async_trait;
use shared_types::{BlockContext, ValidatorUpdate};

/// An invariant check: returns a message and whether the invariant is broken.
pub type Invariant = fn(&BlockContext) -> (String, bool);

/// Registry the host uses to collect module invariants.
#[derive(Default)]
pub struct InvariantRegistry {
    routes: Vec<(String, String, Invariant)>,
}

impl InvariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_route(&mut self, module: &str, route: &str, invariant: Invariant) {
        self.routes
            .push((module.to_string(), route.to_string(), invariant));
    }

    /// Registered (module, route) pairs.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(m, r, _)| (m.as_str(), r.as_str()))
    }

    /// Run every invariant; returns the messages of the broken ones.
    pub fn check_all(&self, ctx: &BlockContext) -> Vec<String> {
        self.routes
            .iter()
            .filter_map(|(_, _, invariant)| {
                let (msg, broken) = invariant(ctx);
                broken.then_some(msg)
            })
            .collect()
    }
}

/// Stateless module properties.
pub trait AppModuleBasic {
    /// Module name.
    fn name(&self) -> &'static str;

    /// Default genesis document as JSON bytes.
    fn default_genesis(&self) -> VpurseResult<Vec<u8>>;

    /// Parse and validate a genesis document.
    fn validate_genesis(&self, bz: &[u8]) -> VpurseResult<()>;
}

/// Block lifecycle hooks.
#[async_trait]
pub trait AppModule: AppModuleBasic + Send + Sync {
    /// Route for legacy queries.
    fn querier_route(&self) -> &'static str;

    /// Register the module's invariants.
    fn register_invariants(&self, registry: &mut InvariantRegistry);

    /// Called before the block's transactions execute.
    async fn begin_block(&self, ctx: &BlockContext);

    /// Called after every transaction of the block has been applied.
    ///
    /// An `Err` here means this node cannot safely finalize the block.
    async fn end_block(&self, ctx: &BlockContext) -> VpurseResult<Vec<ValidatorUpdate>>;

    /// Load state from a genesis document.
    fn init_genesis(&self, ctx: &BlockContext, bz: &[u8]) -> VpurseResult<Vec<ValidatorUpdate>>;

    /// Dump state as a genesis document.
    fn export_genesis(&self, ctx: &BlockContext) -> VpurseResult<Vec<u8>>;
}
