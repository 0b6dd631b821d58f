//! # Integration Tests
//!
//! End-of-block runs of the vpurse module with a controller task on the far
//! side of a `ChannelControllerBridge`.

pub mod flows;
