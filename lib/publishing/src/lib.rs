//! Channel publishing for market-relay.
//!
//! This crate provides:
//!
//! - **Channel trait**: The broadcast destination listings are posted to
//! - **Listing publisher**: Caption rendering, length checks and posting
//! - **Cancellation handler**: Retracting a posted listing by token

pub mod cancellation;
pub mod caption;
pub mod channel;
pub mod error;
pub mod publisher;
pub mod token;

pub use cancellation::CancellationHandler;
pub use caption::{Caption, MAX_CAPTION_CHARS};
pub use channel::{Channel, InMemoryChannel, PublicationReference};
pub use error::{ChannelError, PublishError, RetractError};
pub use publisher::ListingPublisher;
pub use token::CancellationToken;
