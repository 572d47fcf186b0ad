//! Core domain types and utilities for market-relay.
//!
//! This crate provides the identifier types and error handling shared by the
//! conversation, publishing and bot crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ChatId, MessageId, ParseIdError, UserId};
