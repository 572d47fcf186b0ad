//! Message catalogs.
//!
//! A catalog holds the templates for one language. English is built in;
//! other languages are loaded from `<dir>/<language>.json`, a flat object
//! mapping catalog keys to templates. Keys missing from a loaded catalog fall
//! back to English.

use crate::error::CatalogError;
use crate::key::MessageKey;
use crate::template;
use std::collections::HashMap;
use std::path::Path;

/// The language used when no other is configured or available.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Templates for a single language.
#[derive(Debug, Clone)]
pub struct Catalog {
    language: String,
    entries: HashMap<MessageKey, String>,
}

impl Catalog {
    /// The built-in English catalog.
    #[must_use]
    pub fn english() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Loads the catalog for `language` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a flat JSON
    /// object of strings.
    pub fn load(dir: &Path, language: &str) -> Result<Self, CatalogError> {
        let path = dir.join(format!("{language}.json"));
        let raw = std::fs::read_to_string(&path).map_err(|e| CatalogError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let parsed: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| CatalogError::InvalidFormat {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let mut entries = HashMap::with_capacity(parsed.len());
        for (key, value) in parsed {
            match MessageKey::from_key(&key) {
                Some(message_key) => {
                    entries.insert(message_key, value);
                }
                None => {
                    tracing::warn!(language, key = %key, "ignoring unknown catalog key");
                }
            }
        }

        tracing::debug!(language, entries = entries.len(), "loaded message catalog");

        Ok(Self {
            language: language.to_string(),
            entries,
        })
    }

    /// Resolves the catalog for the configured language.
    ///
    /// English, a missing locales directory, or a language without a
    /// catalog file all yield the built-in English catalog. A catalog file
    /// that exists but cannot be loaded is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the language's catalog file exists but is invalid.
    pub fn resolve(dir: Option<&Path>, language: &str) -> Result<Self, CatalogError> {
        if language == DEFAULT_LANGUAGE {
            return Ok(Self::english());
        }

        match dir {
            Some(dir) if dir.join(format!("{language}.json")).is_file() => {
                Self::load(dir, language)
            }
            _ => {
                tracing::warn!(
                    language,
                    fallback = DEFAULT_LANGUAGE,
                    "language is not supported, falling back"
                );
                Ok(Self::english())
            }
        }
    }

    /// Returns the catalog's language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the template for a key.
    #[must_use]
    pub fn text(&self, key: MessageKey) -> &str {
        self.entries
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.english())
    }

    /// Renders the template for a key with the given substitutions.
    #[must_use]
    pub fn render(&self, key: MessageKey, substitutions: &[(&str, &str)]) -> String {
        template::render(self.text(key), substitutions)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english()
    }
}
