//! Cancellation tokens.
//!
//! The token rides in the payload of the "cancel this listing" button and
//! is the only thing needed to retract a listing. Its form is exactly
//! `cancel <message id>`: the word `cancel`, one space, and the decimal id.

use crate::channel::PublicationReference;
use crate::error::RetractError;
use market_relay_core::MessageId;
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "cancel";

/// A parsed cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationToken {
    message_id: MessageId,
}

impl CancellationToken {
    /// Creates the token for a publication.
    #[must_use]
    pub fn new(reference: PublicationReference) -> Self {
        Self {
            message_id: reference.message_id,
        }
    }

    /// Returns the published message the token refers to.
    #[must_use]
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Returns the wire form of the token.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX} {}", self.message_id)
    }
}

impl FromStr for CancellationToken {
    type Err = RetractError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let malformed = || RetractError::MalformedCancellationToken {
            payload: payload.to_string(),
        };

        let mut parts = payload.split(' ');
        let (Some(PREFIX), Some(id), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let message_id = id.parse::<MessageId>().map_err(|_| malformed())?;

        Ok(Self { message_id })
    }
}
