//! Listing publisher.
//!
//! Turns a finished submission into a channel post:
//! 1. Renders the localized caption
//! 2. Rejects it locally if it is over the length limit
//! 3. Posts photo and caption in one call
//!
//! The confirmation offered back to the submitter carries the cancellation
//! token for the new post.

use crate::caption::{Caption, MAX_CAPTION_CHARS};
use crate::channel::{Channel, PublicationReference};
use crate::error::PublishError;
use crate::token::CancellationToken;
use market_relay_conversation::{FinishedSubmission, OutboundAction};
use market_relay_core::{ChatId, MessageId};
use market_relay_locale::{Catalog, MessageKey};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Publishes finished submissions to the channel.
#[derive(Clone)]
pub struct ListingPublisher {
    channel: Arc<dyn Channel>,
    catalog: Arc<Catalog>,
}

impl ListingPublisher {
    /// Creates a publisher for a channel.
    #[must_use]
    pub fn new(channel: Arc<dyn Channel>, catalog: Arc<Catalog>) -> Self {
        Self { channel, catalog }
    }

    /// Renders and checks the caption for a submission.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::CaptionTooLong`] if the rendered caption is
    /// over the limit.
    pub fn caption(&self, submission: &FinishedSubmission) -> Result<Caption, PublishError> {
        let username = submission.submitter_label();
        let text = self.catalog.render(
            MessageKey::ItemSale,
            &[
                ("item_name", submission.name.as_str()),
                ("item_price", submission.price.as_str()),
                ("username", username.as_str()),
            ],
        );
        Caption::new(text)
    }

    /// Publishes a submission.
    ///
    /// Nothing is sent to the channel unless the caption passes the length
    /// check. Failed posts are not retried.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::CaptionTooLong`] or
    /// [`PublishError::PublicationFailed`].
    #[instrument(skip(self, submission), fields(user_id = %submission.submitter.user_id, channel = self.channel.handle()))]
    pub async fn publish(
        &self,
        submission: &FinishedSubmission,
    ) -> Result<PublicationReference, PublishError> {
        let caption = self.caption(submission).inspect_err(|e| {
            warn!(error = %e, "refusing to publish listing");
        })?;

        let reference = self
            .channel
            .publish_photo(&submission.photo, &caption)
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to publish listing");
                PublishError::from(e)
            })?;

        info!(message_id = %reference.message_id, "listing published");
        Ok(reference)
    }
}

/// The reply confirming a publication, with the button that retracts it.
#[must_use]
pub fn confirmation(
    chat_id: ChatId,
    reply_to: MessageId,
    reference: PublicationReference,
) -> OutboundAction {
    OutboundAction::ReplyWithAction {
        chat_id,
        reply_to: Some(reply_to),
        key: MessageKey::ThanksSale,
        action_label: MessageKey::CancelSell,
        action_payload: CancellationToken::new(reference).encode(),
    }
}

/// The reply telling the submitter why the listing was not published.
#[must_use]
pub fn failure_reply(chat_id: ChatId, reply_to: MessageId, error: &PublishError) -> OutboundAction {
    match error {
        PublishError::CaptionTooLong { .. } => {
            OutboundAction::reply(chat_id, reply_to, MessageKey::CaptionTooLong)
                .with_substitution("limit", MAX_CAPTION_CHARS.to_string())
        }
        PublishError::PublicationFailed { reason } => {
            OutboundAction::reply(chat_id, reply_to, MessageKey::PublicationFailed)
                .with_substitution("reason", reason.clone())
        }
    }
}
