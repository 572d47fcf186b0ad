//! Outbound delivery seam.
//!
//! The service hands every reply intent to a [`Transport`]. The Telegram
//! implementation renders and sends it; [`RecordingTransport`] keeps it
//! for inspection.

use crate::error::TransportError;
use async_trait::async_trait;
use market_relay_conversation::OutboundAction;
use tokio::sync::Mutex;

/// Trait for delivering replies to users.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform does not accept the reply.
    async fn send(&self, action: &OutboundAction) -> Result<(), TransportError>;
}

/// A transport that records every action it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundAction>>,
}

impl RecordingTransport {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything sent so far, in order.
    pub async fn sent(&self) -> Vec<OutboundAction> {
        self.sent.lock().await.clone()
    }

    /// Removes and returns everything sent so far.
    pub async fn take(&self) -> Vec<OutboundAction> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, action: &OutboundAction) -> Result<(), TransportError> {
        self.sent.lock().await.push(action.clone());
        Ok(())
    }
}
