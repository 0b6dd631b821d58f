//! Controller bridge adapters
//!
//! Implements the `ControllerBridge` port.
//!
//! - `ChannelControllerBridge`: hands each payload to the controller task over
//!   an mpsc channel and waits on a oneshot for its verdict
//! - `MockControllerBridge`: records calls, optionally fails them

use crate::domain::DeliveryPayload;
use crate::error::ControllerError;
use crate::ports::outbound::ControllerBridge;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::BlockContext;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// One delivery as seen by the controller side.
#[derive(Debug)]
pub struct ControllerRequest {
    pub chain_id: String,
    pub block_height: u64,
    pub payload: DeliveryPayload,
    reply: oneshot::Sender<Result<Vec<u8>, String>>,
}

impl ControllerRequest {
    /// Acknowledge the update. The reply body is opaque to the module.
    pub fn acknowledge(self, reply: Vec<u8>) {
        // The module may have been dropped mid-call; nothing to do then.
        let _ = self.reply.send(Ok(reply));
    }

    /// Refuse the update. The module treats this as fatal for the block.
    pub fn reject(self, reason: impl Into<String>) {
        let _ = self.reply.send(Err(reason.into()));
    }
}

/// Bridge to a controller task running in the same process.
#[derive(Clone)]
pub struct ChannelControllerBridge {
    sender: mpsc::Sender<ControllerRequest>,
}

impl ChannelControllerBridge {
    pub fn new(sender: mpsc::Sender<ControllerRequest>) -> Self {
        Self { sender }
    }

    /// Create a bridge together with the receiving end for the controller.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ControllerRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl ControllerBridge for ChannelControllerBridge {
    async fn call_to_controller(
        &self,
        ctx: &BlockContext,
        payload: &DeliveryPayload,
    ) -> Result<Vec<u8>, ControllerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = ControllerRequest {
            chain_id: ctx.chain_id().to_string(),
            block_height: ctx.block_height(),
            payload: payload.clone(),
            reply: reply_tx,
        };

        debug!(
            block_height = ctx.block_height(),
            bytes = payload.len(),
            "Sending balance update to controller"
        );
        self.sender
            .send(request)
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;

        reply_rx
            .await
            .map_err(|_| ControllerError::NoReply)?
            .map_err(ControllerError::Rejected)
    }
}

/// A call captured by the mock.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub block_height: u64,
    pub payload: DeliveryPayload,
}

/// In-memory mock bridge for testing.
#[derive(Default)]
pub struct MockControllerBridge {
    calls: RwLock<Vec<RecordedCall>>,
    failure: Option<ControllerError>,
}

impl MockControllerBridge {
    /// A mock that acknowledges every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that records and then fails every call.
    pub fn failing(error: ControllerError) -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            failure: Some(error),
        }
    }

    /// All calls received, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }
}

#[async_trait]
impl ControllerBridge for MockControllerBridge {
    async fn call_to_controller(
        &self,
        ctx: &BlockContext,
        payload: &DeliveryPayload,
    ) -> Result<Vec<u8>, ControllerError> {
        self.calls.write().push(RecordedCall {
            block_height: ctx.block_height(),
            payload: payload.clone(),
        });
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(b"true".to_vec()),
        }
    }
}
