//! # Shared Types Crate
//!
//! Ledger-side types shared by the vpurse module, its adapters and the test
//! suite: account addresses, multi-denomination balances, recorded block
//! events and the block context.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every type crossing a crate boundary lives here.
//! - **Decode Once**: Raw event tags and attribute keys become closed enums at
//!   the boundary; nothing downstream compares strings.
//! - **Deterministic Serialization**: Balances are kept normalized so their
//!   encoding is identical on every node.

pub mod context;
pub mod entities;
pub mod errors;
pub mod events;

pub use context::*;
pub use entities::*;
pub use errors::*;
pub use events::*;
