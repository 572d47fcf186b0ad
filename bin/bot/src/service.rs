//! Event orchestration.
//!
//! Routes one inbound event through the dialog, publishes finished
//! submissions, handles retraction requests, and delivers every resulting
//! reply through the [`Transport`].

use crate::transport::Transport;
use market_relay_conversation::{FlowController, InboundEvent, OutboundAction};
use market_relay_publishing::publisher::{confirmation, failure_reply};
use market_relay_publishing::{CancellationHandler, ListingPublisher};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Handles inbound events end to end.
#[derive(Clone)]
pub struct ListingService {
    flow: FlowController,
    publisher: ListingPublisher,
    cancellation: CancellationHandler,
    transport: Arc<dyn Transport>,
}

impl ListingService {
    /// Creates a service.
    #[must_use]
    pub fn new(
        flow: FlowController,
        publisher: ListingPublisher,
        cancellation: CancellationHandler,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            flow,
            publisher,
            cancellation,
            transport,
        }
    }

    /// Handles one event. Failures are reported to the user or logged;
    /// nothing is returned to the caller.
    #[instrument(skip(self, event), fields(user_id = %event.user_id(), kind = event.kind()))]
    pub async fn handle(&self, event: InboundEvent) {
        if let InboundEvent::Callback {
            sender,
            callback_id,
            payload,
        } = &event
        {
            let ack = self.cancellation.handle(sender, callback_id, payload).await;
            self.deliver(&ack).await;
            return;
        }

        let outcome = self.flow.handle(&event).await;
        for reply in &outcome.replies {
            self.deliver(reply).await;
        }

        let (Some(submission), Some((chat_id, message_id))) = (outcome.finished, event.origin())
        else {
            return;
        };

        let reply = match self.publisher.publish(&submission).await {
            Ok(reference) => confirmation(chat_id, message_id, reference),
            Err(e) => failure_reply(chat_id, message_id, &e),
        };
        self.deliver(&reply).await;
    }

    async fn deliver(&self, action: &OutboundAction) {
        if let Err(e) = self.transport.send(action).await {
            warn!(error = %e, key = %action.key(), "failed to deliver reply");
        }
    }
}
