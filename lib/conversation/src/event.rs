//! Inbound events delivered by the transport.

use market_relay_core::{ChatId, MessageId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The user an event came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Public handle, if the user has one.
    pub username: Option<String>,
}

impl Sender {
    /// Creates a sender.
    #[must_use]
    pub fn new(user_id: UserId, username: Option<String>) -> Self {
        Self { user_id, username }
    }

    /// The public handle, or the numeric id when there is none.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.username.as_deref() {
            Some(handle) if !handle.is_empty() => handle.to_string(),
            _ => self.user_id.to_string(),
        }
    }
}

/// Opaque transport reference to an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Wraps a transport file identifier.
    #[must_use]
    pub fn new(file_id: impl Into<String>) -> Self {
        Self(file_id.into())
    }

    /// Returns the transport file identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One resolution of an attached photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoVariant {
    /// Transport file identifier of this resolution.
    pub file_id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Size in bytes, when known.
    pub file_size: Option<u64>,
}

impl PhotoVariant {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Picks the highest-resolution variant.
    ///
    /// Compares pixel area, then file size. On a full tie the later variant
    /// wins, since transports list resolutions in ascending order.
    #[must_use]
    pub fn select_largest(variants: &[PhotoVariant]) -> Option<PhotoRef> {
        variants
            .iter()
            .max_by_key(|v| (v.area(), v.file_size.unwrap_or(0)))
            .map(|v| PhotoRef::new(v.file_id.clone()))
    }
}

/// A bot command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// `/start`: greet and begin a submission.
    Start,
    /// `/sell`: begin a submission.
    Sell,
    /// `/cancel`: abandon the submission in progress.
    Cancel,
    /// Any other command.
    Other(String),
}

impl Command {
    /// Parses a command from message text.
    ///
    /// Returns `None` unless the text starts with `/`. A `@botname` suffix
    /// on the command word is stripped and the name matched
    /// case-insensitively; anything after the first whitespace is ignored.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.strip_prefix('/')?.split(char::is_whitespace).next()?;
        let name = word.split('@').next().unwrap_or(word).to_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(match name.as_str() {
            "start" => Self::Start,
            "sell" => Self::Sell,
            "cancel" => Self::Cancel,
            _ => Self::Other(name),
        })
    }

    /// Returns the command name without the leading slash.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Sell => "sell",
            Self::Cancel => "cancel",
            Self::Other(name) => name,
        }
    }
}

/// An event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A plain text message.
    Text {
        sender: Sender,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    /// A photo message, with every resolution the transport offers.
    Photo {
        sender: Sender,
        chat_id: ChatId,
        message_id: MessageId,
        variants: Vec<PhotoVariant>,
    },
    /// A bot command.
    Command {
        sender: Sender,
        chat_id: ChatId,
        message_id: MessageId,
        command: Command,
    },
    /// A press on an inline button.
    Callback {
        sender: Sender,
        callback_id: String,
        payload: String,
    },
}

impl InboundEvent {
    /// Returns who sent the event.
    #[must_use]
    pub fn sender(&self) -> &Sender {
        match self {
            Self::Text { sender, .. }
            | Self::Photo { sender, .. }
            | Self::Command { sender, .. }
            | Self::Callback { sender, .. } => sender,
        }
    }

    /// Returns the sending user's id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.sender().user_id
    }

    /// Returns the chat and message to reply to, for message events.
    #[must_use]
    pub fn origin(&self) -> Option<(ChatId, MessageId)> {
        match self {
            Self::Text {
                chat_id,
                message_id,
                ..
            }
            | Self::Photo {
                chat_id,
                message_id,
                ..
            }
            | Self::Command {
                chat_id,
                message_id,
                ..
            } => Some((*chat_id, *message_id)),
            Self::Callback { .. } => None,
        }
    }

    /// Short event kind for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Photo { .. } => "photo",
            Self::Command { .. } => "command",
            Self::Callback { .. } => "callback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(file_id: &str, width: u32, height: u32, size: Option<u64>) -> PhotoVariant {
        PhotoVariant {
            file_id: file_id.to_string(),
            width,
            height,
            file_size: size,
        }
    }

    #[test]
    fn display_label_prefers_handle() {
        let sender = Sender::new(UserId::new(42), Some("alice".to_string()));
        assert_eq!(sender.display_label(), "alice");
    }

    #[test]
    fn display_label_falls_back_to_id() {
        assert_eq!(Sender::new(UserId::new(42), None).display_label(), "42");
        assert_eq!(
            Sender::new(UserId::new(42), Some(String::new())).display_label(),
            "42"
        );
    }

    #[test]
    fn select_largest_by_area() {
        let variants = vec![
            variant("small", 90, 60, Some(1_000)),
            variant("large", 1280, 853, Some(90_000)),
            variant("medium", 320, 213, Some(10_000)),
        ];
        assert_eq!(
            PhotoVariant::select_largest(&variants),
            Some(PhotoRef::new("large"))
        );
    }

    #[test]
    fn select_largest_tie_prefers_bigger_file_then_last() {
        let variants = vec![
            variant("a", 100, 100, Some(5)),
            variant("b", 100, 100, Some(9)),
            variant("c", 100, 100, Some(9)),
        ];
        assert_eq!(PhotoVariant::select_largest(&variants), Some(PhotoRef::new("c")));
    }

    #[test]
    fn select_largest_empty() {
        assert_eq!(PhotoVariant::select_largest(&[]), None);
    }

    #[test]
    fn command_parse() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/sell"), Some(Command::Sell));
        assert_eq!(Command::parse("/SELL@market_bot extra"), Some(Command::Sell));
        assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
        assert_eq!(
            Command::parse("/help"),
            Some(Command::Other("help".to_string()))
        );
    }

    #[test]
    fn command_name_round_trips_through_parse() {
        for text in ["/start", "/sell", "/cancel", "/Help@market_bot"] {
            let command = Command::parse(text).expect("command");
            assert_eq!(Command::parse(&format!("/{}", command.name())), Some(command));
        }
        assert_eq!(Command::parse("/Help").expect("command").name(), "help");
    }

    #[test]
    fn command_parse_rejects_plain_text() {
        assert_eq!(Command::parse("sell"), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse("/ start"), None);
        assert_eq!(Command::parse("/@bot"), None);
    }

    #[test]
    fn event_accessors() {
        let event = InboundEvent::Text {
            sender: Sender::new(UserId::new(1), None),
            chat_id: ChatId::new(1),
            message_id: MessageId::new(10),
            text: "hi".to_string(),
        };
        assert_eq!(event.user_id(), UserId::new(1));
        assert_eq!(event.origin(), Some((ChatId::new(1), MessageId::new(10))));
        assert_eq!(event.kind(), "text");

        let callback = InboundEvent::Callback {
            sender: Sender::new(UserId::new(1), None),
            callback_id: "cb".to_string(),
            payload: "cancel 5".to_string(),
        };
        assert_eq!(callback.origin(), None);
    }
}
