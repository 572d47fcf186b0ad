//! The listing channel backed by a Telegram channel.

use async_trait::async_trait;
use market_relay_conversation::PhotoRef;
use market_relay_core::MessageId;
use market_relay_publishing::{Caption, Channel, ChannelError, PublicationReference};
use std::fmt;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, Recipient};
use teloxide::{ApiError, RequestError};

/// Posts listings to a public Telegram channel the bot administers.
#[derive(Clone)]
pub struct TelegramChannel {
    bot: Bot,
    handle: String,
}

impl TelegramChannel {
    /// Creates a channel for `handle` (`@name`).
    #[must_use]
    pub fn new(bot: Bot, handle: impl Into<String>) -> Self {
        Self {
            bot,
            handle: handle.into(),
        }
    }

    fn target(&self) -> Recipient {
        Recipient::ChannelUsername(self.handle.clone())
    }
}

impl fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn handle(&self) -> &str {
        &self.handle
    }

    async fn publish_photo(
        &self,
        photo: &PhotoRef,
        caption: &Caption,
    ) -> Result<PublicationReference, ChannelError> {
        let file = InputFile::file_id(FileId(photo.as_str().to_string()));
        let message = self
            .bot
            .send_photo(self.target(), file)
            .caption(caption.as_str())
            .await
            .map_err(|e| channel_error(e, None))?;
        Ok(PublicationReference::new(MessageId::new(message.id.0)))
    }

    async fn delete_message(&self, message_id: MessageId) -> Result<(), ChannelError> {
        self.bot
            .delete_message(self.target(), teloxide::types::MessageId(message_id.get()))
            .await
            .map(|_| ())
            .map_err(|e| channel_error(e, Some(message_id)))
    }
}

/// Maps a Bot API failure. `deleting` names the message a delete call
/// targeted, so a missing message can be told apart from other rejections.
fn channel_error(error: RequestError, deleting: Option<MessageId>) -> ChannelError {
    match (error, deleting) {
        (RequestError::Api(ApiError::MessageToDeleteNotFound), Some(message_id)) => {
            ChannelError::MessageNotFound { message_id }
        }
        (RequestError::Api(e), _) => ChannelError::Rejected {
            description: e.to_string(),
        },
        (other, _) => ChannelError::RequestFailed {
            reason: other.to_string(),
        },
    }
}
