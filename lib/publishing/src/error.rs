//! Error types for the publishing crate.
//!
//! - `ChannelError`: Errors reported by the channel itself
//! - `PublishError`: Why a listing was not published
//! - `RetractError`: Why a listing was not retracted

use market_relay_core::MessageId;
use std::fmt;

/// Errors from channel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The message does not exist (never posted or already deleted).
    MessageNotFound { message_id: MessageId },
    /// The channel refused the request.
    Rejected { description: String },
    /// The request did not complete.
    RequestFailed { reason: String },
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageNotFound { message_id } => {
                write!(f, "channel message not found: {message_id}")
            }
            Self::Rejected { description } => {
                write!(f, "channel rejected request: {description}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "channel request failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ChannelError {}

/// Errors from publishing a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The rendered caption is over the limit. Nothing was sent.
    CaptionTooLong { length: usize, limit: usize },
    /// The channel did not accept the post.
    PublicationFailed { reason: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaptionTooLong { length, limit } => {
                write!(f, "caption is {length} characters, limit is {limit}")
            }
            Self::PublicationFailed { reason } => {
                write!(f, "publication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for PublishError {}

impl From<ChannelError> for PublishError {
    fn from(err: ChannelError) -> Self {
        Self::PublicationFailed {
            reason: err.to_string(),
        }
    }
}

/// Errors from retracting a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetractError {
    /// The payload is not a cancellation token. Nothing was deleted.
    MalformedCancellationToken { payload: String },
    /// The listing is not in the channel.
    PublicationNotFound { message_id: MessageId },
    /// The channel failed to delete the listing.
    RetractionFailed { message_id: MessageId, reason: String },
}

impl fmt::Display for RetractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCancellationToken { payload } => {
                write!(f, "malformed cancellation token: {payload:?}")
            }
            Self::PublicationNotFound { message_id } => {
                write!(f, "publication not found: {message_id}")
            }
            Self::RetractionFailed { message_id, reason } => {
                write!(f, "failed to retract publication {message_id}: {reason}")
            }
        }
    }
}

impl std::error::Error for RetractError {}
