//! Error types for the locale crate.

use std::fmt;
use std::path::PathBuf;

/// Errors from loading a message catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog file could not be read.
    ReadFailed { path: PathBuf, reason: String },
    /// The catalog file is not a flat JSON object of strings.
    InvalidFormat { path: PathBuf, reason: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { path, reason } => {
                write!(f, "failed to read catalog {}: {reason}", path.display())
            }
            Self::InvalidFormat { path, reason } => {
                write!(f, "invalid catalog {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for CatalogError {}
