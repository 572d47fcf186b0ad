//! Localized message catalog for market-relay.
//!
//! This crate provides:
//!
//! - **Message keys**: Every user-visible string the bot can send
//! - **Catalog**: Key lookup for one language with English fallback
//! - **Templates**: Named `{placeholder}` substitution

pub mod catalog;
pub mod error;
pub mod key;
pub mod template;

pub use catalog::{Catalog, DEFAULT_LANGUAGE};
pub use error::CatalogError;
pub use key::MessageKey;
pub use template::render;
