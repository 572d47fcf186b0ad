//! Translation of Bot API updates into dialog events.

use market_relay_conversation::{Command, InboundEvent, PhotoVariant, Sender};
use market_relay_core::{ChatId, MessageId, UserId};
use teloxide::types::{CallbackQuery, Message, PhotoSize, Update, UpdateKind, User};
use tracing::debug;

/// Converts an update into an event.
///
/// Returns `None` for updates the bot does not handle: messages without a
/// sender, messages from bots, and messages with neither text nor photo.
/// A photo takes precedence over text; text starting with `/` is a command.
#[must_use]
pub fn into_event(update: Update) -> Option<InboundEvent> {
    match update.kind {
        UpdateKind::CallbackQuery(query) => callback_event(query),
        UpdateKind::Message(message) => message_event(message),
        _ => {
            debug!(update_id = update.id.0, "skipping unsupported update");
            None
        }
    }
}

fn callback_event(query: CallbackQuery) -> Option<InboundEvent> {
    Some(InboundEvent::Callback {
        sender: sender(&query.from)?,
        callback_id: query.id.0,
        payload: query.data.unwrap_or_default(),
    })
}

fn message_event(message: Message) -> Option<InboundEvent> {
    let sender = message.from.as_ref().filter(|u| !u.is_bot).and_then(sender)?;
    let chat_id = ChatId::new(message.chat.id.0);
    let message_id = MessageId::new(message.id.0);

    if let Some(photo) = message.photo() {
        return Some(InboundEvent::Photo {
            sender,
            chat_id,
            message_id,
            variants: photo.iter().map(variant).collect(),
        });
    }

    let text = message.text()?;
    Some(match Command::parse(text) {
        Some(command) => {
            debug!(command = command.name(), "received command");
            InboundEvent::Command {
                sender,
                chat_id,
                message_id,
                command,
            }
        }
        None => InboundEvent::Text {
            sender,
            chat_id,
            message_id,
            text: text.to_string(),
        },
    })
}

fn sender(user: &User) -> Option<Sender> {
    let id = i64::try_from(user.id.0).ok()?;
    Some(Sender::new(UserId::new(id), user.username.clone()))
}

fn variant(size: &PhotoSize) -> PhotoVariant {
    PhotoVariant {
        file_id: size.file.id.0.clone(),
        width: size.width,
        height: size.height,
        file_size: Some(u64::from(size.file.size)),
    }
}
