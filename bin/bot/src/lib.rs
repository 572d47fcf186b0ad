//! Telegram front end for market-relay.
//!
//! Wires the submission dialog and the publishing crate to the Telegram
//! Bot API:
//!
//! - **Config**: Environment-based settings
//! - **Telegram**: teloxide polling, update translation, channel and
//!   transport implementations
//! - **Service**: Routes one event through the dialog, publisher and
//!   cancellation handler
//! - **Dispatcher**: Serializes each user's events on a dedicated worker

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod service;
pub mod telegram;
pub mod transport;

pub use config::BotConfig;
pub use dispatcher::Dispatcher;
pub use error::{StartupError, TransportError};
pub use service::ListingService;
pub use transport::{RecordingTransport, Transport};
