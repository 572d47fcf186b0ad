//! Reply intents produced by the dialog.
//!
//! The dialog never renders text itself. It names a catalog key and its
//! substitutions; the transport looks the template up and sends it.

use market_relay_core::{ChatId, MessageId};
use market_relay_locale::MessageKey;

/// Something the transport should send back to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    /// A localized text reply.
    ReplyText {
        chat_id: ChatId,
        reply_to: Option<MessageId>,
        key: MessageKey,
        substitutions: Vec<(String, String)>,
    },
    /// A localized reply carrying one inline button.
    ReplyWithAction {
        chat_id: ChatId,
        reply_to: Option<MessageId>,
        key: MessageKey,
        action_label: MessageKey,
        action_payload: String,
    },
    /// A toast acknowledging an inline button press.
    AcknowledgeCallback { callback_id: String, key: MessageKey },
}

impl OutboundAction {
    /// A text reply to a specific message, without substitutions.
    #[must_use]
    pub fn reply(chat_id: ChatId, reply_to: MessageId, key: MessageKey) -> Self {
        Self::ReplyText {
            chat_id,
            reply_to: Some(reply_to),
            key,
            substitutions: Vec::new(),
        }
    }

    /// Adds a substitution to a text reply. Other actions are unchanged.
    #[must_use]
    pub fn with_substitution(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::ReplyText {
            ref mut substitutions,
            ..
        } = self
        {
            substitutions.push((name.into(), value.into()));
        }
        self
    }

    /// Returns the catalog key of the main message.
    #[must_use]
    pub fn key(&self) -> MessageKey {
        match self {
            Self::ReplyText { key, .. }
            | Self::ReplyWithAction { key, .. }
            | Self::AcknowledgeCallback { key, .. } => *key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_builder() {
        let action = OutboundAction::reply(ChatId::new(5), MessageId::new(9), MessageKey::CaptionTooLong)
            .with_substitution("limit", "2000");

        match action {
            OutboundAction::ReplyText {
                chat_id,
                reply_to,
                key,
                substitutions,
            } => {
                assert_eq!(chat_id, ChatId::new(5));
                assert_eq!(reply_to, Some(MessageId::new(9)));
                assert_eq!(key, MessageKey::CaptionTooLong);
                assert_eq!(substitutions, vec![("limit".to_string(), "2000".to_string())]);
            }
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    #[test]
    fn substitution_ignored_on_acknowledgement() {
        let action = OutboundAction::AcknowledgeCallback {
            callback_id: "cb".to_string(),
            key: MessageKey::Error,
        }
        .with_substitution("x", "y");
        assert_eq!(action.key(), MessageKey::Error);
    }
}
