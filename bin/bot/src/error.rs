//! Error types for the bot binary.

use std::fmt;

/// Errors that stop the bot from starting or running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// Configuration is missing or invalid.
    Config { details: String },
    /// The message catalog could not be loaded.
    Catalog { details: String },
    /// The Bot API client could not be built.
    Client { details: String },
    /// The Bot API did not answer the startup handshake.
    Unreachable { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {details}"),
            Self::Catalog { details } => write!(f, "failed to load message catalog: {details}"),
            Self::Client { details } => write!(f, "failed to create Bot API client: {details}"),
            Self::Unreachable { details } => write!(f, "Bot API is unreachable: {details}"),
        }
    }
}

impl std::error::Error for StartupError {}

/// Errors from delivering a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The platform did not accept the reply.
    DeliveryFailed { action: &'static str, reason: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeliveryFailed { action, reason } => {
                write!(f, "failed to deliver {action}: {reason}")
            }
        }
    }
}

impl std::error::Error for TransportError {}
