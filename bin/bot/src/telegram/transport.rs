//! Reply delivery through the Bot API.

use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use market_relay_conversation::OutboundAction;
use market_relay_core::{ChatId, MessageId};
use market_relay_locale::Catalog;
use std::fmt;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardButton, InlineKeyboardMarkup, ReplyParameters};

/// Renders reply intents with the catalog and sends them as Bot API calls.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    catalog: Arc<Catalog>,
}

/// A rendered reply intent.
#[derive(Debug, Clone, PartialEq)]
enum Rendered {
    Message(MessageParts),
    Answer { callback_id: String, text: String },
}

#[derive(Debug, Clone, PartialEq)]
struct MessageParts {
    chat_id: ChatId,
    text: String,
    reply_to: Option<MessageId>,
    button: Option<(String, String)>,
}

impl MessageParts {
    fn reply_parameters(&self) -> Option<ReplyParameters> {
        self.reply_to.map(|message_id| {
            ReplyParameters::new(teloxide::types::MessageId(message_id.get()))
                .allow_sending_without_reply()
        })
    }

    fn keyboard(&self) -> Option<InlineKeyboardMarkup> {
        self.button.as_ref().map(|(text, payload)| {
            InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
                text.clone(),
                payload.clone(),
            )]])
        })
    }
}

impl fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramTransport")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl TelegramTransport {
    /// Creates a transport that renders with `catalog`.
    #[must_use]
    pub fn new(bot: Bot, catalog: Arc<Catalog>) -> Self {
        Self { bot, catalog }
    }

    fn render(&self, action: &OutboundAction) -> Rendered {
        match action {
            OutboundAction::ReplyText {
                chat_id,
                reply_to,
                key,
                substitutions,
            } => {
                let substitutions: Vec<(&str, &str)> = substitutions
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                Rendered::Message(MessageParts {
                    chat_id: *chat_id,
                    text: self.catalog.render(*key, &substitutions),
                    reply_to: *reply_to,
                    button: None,
                })
            }
            OutboundAction::ReplyWithAction {
                chat_id,
                reply_to,
                key,
                action_label,
                action_payload,
            } => Rendered::Message(MessageParts {
                chat_id: *chat_id,
                text: self.catalog.text(*key).to_string(),
                reply_to: *reply_to,
                button: Some((
                    self.catalog.text(*action_label).to_string(),
                    action_payload.clone(),
                )),
            }),
            OutboundAction::AcknowledgeCallback { callback_id, key } => Rendered::Answer {
                callback_id: callback_id.clone(),
                text: self.catalog.text(*key).to_string(),
            },
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, action: &OutboundAction) -> Result<(), TransportError> {
        match self.render(action) {
            Rendered::Message(parts) => {
                let mut request = self
                    .bot
                    .send_message(teloxide::types::ChatId(parts.chat_id.get()), parts.text.clone());
                if let Some(reply) = parts.reply_parameters() {
                    request = request.reply_parameters(reply);
                }
                if let Some(keyboard) = parts.keyboard() {
                    request = request.reply_markup(keyboard);
                }
                request
                    .await
                    .map(|_| ())
                    .map_err(|e| TransportError::DeliveryFailed {
                        action: "reply",
                        reason: e.to_string(),
                    })
            }
            Rendered::Answer { callback_id, text } => self
                .bot
                .answer_callback_query(CallbackQueryId(callback_id))
                .text(text)
                .await
                .map(|_| ())
                .map_err(|e| TransportError::DeliveryFailed {
                    action: "callback answer",
                    reason: e.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_relay_locale::MessageKey;

    fn transport() -> TelegramTransport {
        TelegramTransport::new(Bot::new("123:abc"), Arc::new(Catalog::english()))
    }

    #[test]
    fn renders_text_with_substitutions() {
        let action = OutboundAction::reply(ChatId::new(1), MessageId::new(2), MessageKey::CaptionTooLong)
            .with_substitution("limit", "2000");

        let Rendered::Message(parts) = transport().render(&action) else {
            panic!("expected a message");
        };
        assert!(parts.text.contains("2000"));
        assert_eq!(parts.reply_to, Some(MessageId::new(2)));
        assert_eq!(parts.button, None);
        assert!(parts.keyboard().is_none());
    }

    #[test]
    fn renders_button_with_token_payload() {
        let action = OutboundAction::ReplyWithAction {
            chat_id: ChatId::new(1),
            reply_to: Some(MessageId::new(2)),
            key: MessageKey::ThanksSale,
            action_label: MessageKey::CancelSell,
            action_payload: "cancel 77".to_string(),
        };

        let Rendered::Message(parts) = transport().render(&action) else {
            panic!("expected a message");
        };
        let catalog = Catalog::english();
        assert_eq!(parts.text, catalog.text(MessageKey::ThanksSale));
        assert_eq!(
            parts.button,
            Some((
                catalog.text(MessageKey::CancelSell).to_string(),
                "cancel 77".to_string()
            ))
        );

        let keyboard = serde_json::to_value(parts.keyboard()).expect("serialize");
        assert_eq!(keyboard["inline_keyboard"][0][0]["callback_data"], "cancel 77");
        let reply = serde_json::to_value(parts.reply_parameters()).expect("serialize");
        assert_eq!(reply["message_id"], 2);
        assert_eq!(reply["allow_sending_without_reply"], true);
    }

    #[test]
    fn renders_callback_answer() {
        let action = OutboundAction::AcknowledgeCallback {
            callback_id: "cb".to_string(),
            key: MessageKey::DeletedSuccessfully,
        };
        assert_eq!(
            transport().render(&action),
            Rendered::Answer {
                callback_id: "cb".to_string(),
                text: Catalog::english()
                    .text(MessageKey::DeletedSuccessfully)
                    .to_string(),
            }
        );
    }
}
