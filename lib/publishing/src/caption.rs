//! Listing captions.

use crate::error::PublishError;
use std::fmt;

/// Hard limit on a published caption, in characters.
pub const MAX_CAPTION_CHARS: usize = 2000;

/// A caption known to be within [`MAX_CAPTION_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// Checks a rendered caption against the limit.
    ///
    /// Length is counted in Unicode scalar values.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::CaptionTooLong`] if the text is over the limit.
    pub fn new(text: impl Into<String>) -> Result<Self, PublishError> {
        let text = text.into();
        let length = text.chars().count();
        if length > MAX_CAPTION_CHARS {
            return Err(PublishError::CaptionTooLong {
                length,
                limit: MAX_CAPTION_CHARS,
            });
        }
        Ok(Self(text))
    }

    /// Returns the caption text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
