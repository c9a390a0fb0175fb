//! Reader configuration
//!
//! Limits and encoding settings applied while decoding a batch. All fields
//! have defaults matching the usual OData message quotas, so a config file
//! only needs to name the values it changes.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod encoding;
pub mod validation;

pub use encoding::TextEncoding;
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Which array the top-level batch object carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// Accept whichever of `requests` or `responses` the payload names.
    #[default]
    Auto,
    /// Payload must be a batch of requests.
    Requests,
    /// Payload must be a batch of responses.
    Responses,
}

impl BatchMode {
    /// Maps a top-level property name onto a mode, ignoring case.
    #[must_use]
    pub fn from_property_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("requests") {
            Some(BatchMode::Requests)
        } else if name.eq_ignore_ascii_case("responses") {
            Some(BatchMode::Responses)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BatchMode::Auto => "auto",
            BatchMode::Requests => "requests",
            BatchMode::Responses => "responses",
        }
    }

    /// Returns true if a payload of `detected` mode satisfies this setting.
    #[must_use]
    pub fn accepts(self, detected: BatchMode) -> bool {
        self == BatchMode::Auto || self == detected
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch reader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Expected batch mode
    pub mode: BatchMode,

    /// Maximum materialized size of a single item body, in bytes
    pub max_message_size: usize,

    /// Maximum number of top-level parts (a changeset counts once)
    pub max_parts_per_batch: usize,

    /// Maximum number of operations inside one changeset
    pub max_operations_per_changeset: usize,

    /// Encoding for buffered JSON bodies and textual bodies without a charset
    pub encoding: TextEncoding,

    /// Minimum bytes requested from the byte source per refill; in-memory
    /// payloads are handed over in pieces of this size too
    pub read_chunk_size: usize,

    /// Maximum JSON nesting depth accepted by the tokenizer
    pub max_nesting_depth: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            mode: BatchMode::Auto,
            max_message_size: 1_048_576, // 1MB
            max_parts_per_batch: 100,
            max_operations_per_changeset: 1000,
            encoding: TextEncoding::Utf8,
            read_chunk_size: 8192, // 8KB
            max_nesting_depth: 64,
        }
    }
}

impl ReaderConfig {
    /// Tight limits for untrusted input
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_message_size: 262_144, // 256KB
            max_parts_per_batch: 50,
            max_operations_per_changeset: 100,
            max_nesting_depth: 32,
            ..Self::default()
        }
    }

    /// Generous limits for trusted producers
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_message_size: 104_857_600, // 100MB
            max_parts_per_batch: 10_000,
            max_operations_per_changeset: 10_000,
            read_chunk_size: 65_536,
            max_nesting_depth: 256,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_message_size(mut self, bytes: usize) -> Self {
        self.max_message_size = bytes;
        self
    }

    #[must_use]
    pub fn with_max_parts_per_batch(mut self, parts: usize) -> Self {
        self.max_parts_per_batch = parts;
        self
    }

    #[must_use]
    pub fn with_max_operations_per_changeset(mut self, operations: usize) -> Self {
        self.max_operations_per_changeset = operations;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_read_chunk_size(mut self, bytes: usize) -> Self {
        self.read_chunk_size = bytes;
        self
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Parses a JSON configuration document; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Parse` if the document is not valid.
    pub fn from_json(document: &str) -> ConfigResult<Self> {
        serde_json::from_str(document).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_mode_detection_ignores_case() {
        assert_eq!(BatchMode::from_property_name("Requests"), Some(BatchMode::Requests));
        assert_eq!(BatchMode::from_property_name("RESPONSES"), Some(BatchMode::Responses));
        assert_eq!(BatchMode::from_property_name("items"), None);

        assert!(BatchMode::Auto.accepts(BatchMode::Responses));
        assert!(!BatchMode::Requests.accepts(BatchMode::Responses));
    }

    #[test]
    fn partial_json_document_keeps_defaults() {
        let config = ReaderConfig::from_json(
            r#"{"mode":"responses","max_message_size":4096,"encoding":"utf-16le"}"#,
        )
        .unwrap();
        assert_eq!(config.mode, BatchMode::Responses);
        assert_eq!(config.max_message_size, 4096);
        assert_eq!(config.encoding, TextEncoding::Utf16Le);
        assert_eq!(config.max_parts_per_batch, ReaderConfig::default().max_parts_per_batch);

        assert!(matches!(
            ReaderConfig::from_json(r#"{"mode":"sideways"}"#),
            Err(ConfigurationError::Parse(_))
        ));
    }
}
