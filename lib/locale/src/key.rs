//! Message keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-visible message the bot can send.
///
/// Each key maps to a template in the catalog. The string form is the key
/// used in catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    /// Greeting sent on `/start`.
    #[serde(rename = "bot.start_message")]
    StartMessage,
    /// Prompt for the item name.
    #[serde(rename = "bot.enter_sell_name")]
    EnterName,
    /// Prompt for the item price.
    #[serde(rename = "bot.enter_price")]
    EnterPrice,
    /// Prompt for the item photo.
    #[serde(rename = "bot.send_photo")]
    SendPhoto,
    /// Channel caption. Placeholders: `item_name`, `item_price`, `username`.
    #[serde(rename = "bot.item_sale")]
    ItemSale,
    /// Confirmation after a listing is published.
    #[serde(rename = "bot.thanks_sale")]
    ThanksSale,
    /// Label of the inline "cancel this listing" button.
    #[serde(rename = "bot.cancel_sell")]
    CancelSell,
    /// Generic error acknowledgement.
    #[serde(rename = "bot.error")]
    Error,
    /// Acknowledgement after a listing is retracted.
    #[serde(rename = "bot.deleted_successfully")]
    DeletedSuccessfully,
    /// Caption over the length limit. Placeholder: `limit`.
    #[serde(rename = "bot.caption_too_long")]
    CaptionTooLong,
    /// Publishing to the channel failed. Placeholder: `reason`.
    #[serde(rename = "bot.publication_failed")]
    PublicationFailed,
    /// The in-progress dialog was abandoned with `/cancel`.
    #[serde(rename = "bot.sell_cancelled")]
    SellCancelled,
}

impl MessageKey {
    /// All keys, in declaration order.
    pub const ALL: [MessageKey; 12] = [
        Self::StartMessage,
        Self::EnterName,
        Self::EnterPrice,
        Self::SendPhoto,
        Self::ItemSale,
        Self::ThanksSale,
        Self::CancelSell,
        Self::Error,
        Self::DeletedSuccessfully,
        Self::CaptionTooLong,
        Self::PublicationFailed,
        Self::SellCancelled,
    ];

    /// Returns the catalog key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StartMessage => "bot.start_message",
            Self::EnterName => "bot.enter_sell_name",
            Self::EnterPrice => "bot.enter_price",
            Self::SendPhoto => "bot.send_photo",
            Self::ItemSale => "bot.item_sale",
            Self::ThanksSale => "bot.thanks_sale",
            Self::CancelSell => "bot.cancel_sell",
            Self::Error => "bot.error",
            Self::DeletedSuccessfully => "bot.deleted_successfully",
            Self::CaptionTooLong => "bot.caption_too_long",
            Self::PublicationFailed => "bot.publication_failed",
            Self::SellCancelled => "bot.sell_cancelled",
        }
    }

    /// Looks up a key by its catalog string.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// The built-in English template.
    #[must_use]
    pub const fn english(&self) -> &'static str {
        match self {
            Self::StartMessage => {
                "Hi! I post your items for sale to the channel. Send /sell to get started."
            }
            Self::EnterName => "What are you selling? Send me the item name.",
            Self::EnterPrice => "How much do you want for it? Send me the price.",
            Self::SendPhoto => "Almost done. Send me a photo of the item.",
            Self::ItemSale => "{item_name}\nPrice: {item_price}\nSeller: {username}",
            Self::ThanksSale => "Thanks! Your item is now listed in the channel.",
            Self::CancelSell => "Cancel sale",
            Self::Error => "Something went wrong.",
            Self::DeletedSuccessfully => "Your listing was removed from the channel.",
            Self::CaptionTooLong => "Sorry, the listing can't exceed {limit} characters.",
            Self::PublicationFailed => "Error: {reason}",
            Self::SellCancelled => "Okay, the listing was discarded.",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_strings_roundtrip() {
        for key in MessageKey::ALL {
            assert_eq!(MessageKey::from_key(key.as_str()), Some(key));
        }
        assert_eq!(MessageKey::from_key("bot.unknown"), None);
    }

    #[test]
    fn serde_uses_catalog_key() {
        let json = serde_json::to_string(&MessageKey::ThanksSale).expect("serialize");
        assert_eq!(json, "\"bot.thanks_sale\"");
    }

    #[test]
    fn caption_template_has_all_placeholders() {
        let template = MessageKey::ItemSale.english();
        for placeholder in ["{item_name}", "{item_price}", "{username}"] {
            assert!(template.contains(placeholder), "missing {placeholder}");
        }
    }
}
