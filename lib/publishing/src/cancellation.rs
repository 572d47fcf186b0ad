//! Retracting published listings.
//!
//! Anyone holding a listing's cancellation token may retract it; the
//! requester is recorded in logs only. Retraction is not idempotent: a
//! second attempt for the same listing reports that it was not found.

use crate::channel::{Channel, PublicationReference};
use crate::error::{ChannelError, RetractError};
use crate::token::CancellationToken;
use market_relay_conversation::{OutboundAction, Sender};
use market_relay_locale::MessageKey;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Handles "cancel this listing" requests.
#[derive(Clone)]
pub struct CancellationHandler {
    channel: Arc<dyn Channel>,
}

impl CancellationHandler {
    /// Creates a handler for a channel.
    #[must_use]
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        Self { channel }
    }

    /// Retracts the listing named by `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`RetractError::MalformedCancellationToken`] without
    /// contacting the channel if the payload is not a token,
    /// [`RetractError::PublicationNotFound`] if the listing is gone, and
    /// [`RetractError::RetractionFailed`] for other channel failures.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id, channel = self.channel.handle()))]
    pub async fn retract(
        &self,
        requester: &Sender,
        payload: &str,
    ) -> Result<PublicationReference, RetractError> {
        let token: CancellationToken = payload.parse().inspect_err(|e: &RetractError| {
            warn!(error = %e, "rejecting cancellation request");
        })?;
        let message_id = token.message_id();

        match self.channel.delete_message(message_id).await {
            Ok(()) => {
                info!(%message_id, "listing retracted");
                Ok(PublicationReference::new(message_id))
            }
            Err(ChannelError::MessageNotFound { .. }) => {
                warn!(%message_id, "listing to retract not found");
                Err(RetractError::PublicationNotFound { message_id })
            }
            Err(e) => {
                warn!(%message_id, error = %e, "failed to retract listing");
                Err(RetractError::RetractionFailed {
                    message_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Retracts and returns the acknowledgement for the button press.
    ///
    /// Every failure gets the same generic acknowledgement.
    pub async fn handle(&self, requester: &Sender, callback_id: &str, payload: &str) -> OutboundAction {
        let key = match self.retract(requester, payload).await {
            Ok(_) => MessageKey::DeletedSuccessfully,
            Err(_) => MessageKey::Error,
        };
        OutboundAction::AcknowledgeCallback {
            callback_id: callback_id.to_string(),
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::Caption;
    use crate::channel::InMemoryChannel;
    use market_relay_conversation::PhotoRef;
    use market_relay_core::{MessageId, UserId};

    fn requester() -> Sender {
        Sender::new(UserId::new(1), Some("alice".to_string()))
    }

    async fn channel_with_post() -> (Arc<InMemoryChannel>, PublicationReference) {
        let channel = Arc::new(InMemoryChannel::new("@market"));
        let reference = channel
            .publish_photo(&PhotoRef::new("p"), &Caption::new("Bike").expect("caption"))
            .await
            .expect("publish");
        (channel, reference)
    }

    #[tokio::test]
    async fn retracts_existing_listing() {
        let (channel, reference) = channel_with_post().await;
        let handler = CancellationHandler::new(channel.clone());
        let token = CancellationToken::new(reference).encode();

        let retracted = handler.retract(&requester(), &token).await.expect("retract");
        assert_eq!(retracted, reference);
        assert_eq!(channel.post_count().await, 0);
    }

    #[tokio::test]
    async fn replay_after_deletion_is_not_found() {
        let (channel, reference) = channel_with_post().await;
        let handler = CancellationHandler::new(channel.clone());
        let token = CancellationToken::new(reference).encode();

        handler.retract(&requester(), &token).await.expect("first retract");
        let err = handler
            .retract(&requester(), &token)
            .await
            .expect_err("second retract");

        assert_eq!(
            err,
            RetractError::PublicationNotFound {
                message_id: reference.message_id
            }
        );
        assert_eq!(channel.delete_calls().await, 2);
    }

    #[tokio::test]
    async fn malformed_token_makes_no_delete_call() {
        let (channel, _) = channel_with_post().await;
        let handler = CancellationHandler::new(channel.clone());

        for payload in ["cancelled 5", "cancel abc"] {
            let err = handler
                .retract(&requester(), payload)
                .await
                .expect_err(payload);
            assert!(matches!(err, RetractError::MalformedCancellationToken { .. }));
        }
        assert_eq!(channel.delete_calls().await, 0);
        assert_eq!(channel.post_count().await, 1);
    }

    #[tokio::test]
    async fn any_token_holder_may_retract() {
        let (channel, reference) = channel_with_post().await;
        let handler = CancellationHandler::new(channel.clone());
        let stranger = Sender::new(UserId::new(999), None);

        handler
            .retract(&stranger, &CancellationToken::new(reference).encode())
            .await
            .expect("retract");
        assert_eq!(channel.post_count().await, 0);
    }

    #[tokio::test]
    async fn acknowledgements() {
        let (channel, reference) = channel_with_post().await;
        let handler = CancellationHandler::new(channel.clone());
        let token = CancellationToken::new(reference).encode();

        let ack = handler.handle(&requester(), "cb-1", &token).await;
        assert_eq!(
            ack,
            OutboundAction::AcknowledgeCallback {
                callback_id: "cb-1".to_string(),
                key: MessageKey::DeletedSuccessfully
            }
        );

        let ack = handler.handle(&requester(), "cb-2", &token).await;
        assert_eq!(ack.key(), MessageKey::Error);

        let ack = handler.handle(&requester(), "cb-3", "garbage").await;
        assert_eq!(ack.key(), MessageKey::Error);

        assert_eq!(
            handler
                .retract(&requester(), &format!("cancel {}", MessageId::new(404)))
                .await,
            Err(RetractError::PublicationNotFound {
                message_id: MessageId::new(404)
            })
        );
    }
}
