//! Core `BatchReaderBuilder` structure and constructors

use odata_batch_reader::{BatchMode, ReaderConfig, Result};

/// Fluent builder for batch readers
///
/// Collects configuration with chained calls and validates it when a reader
/// is attached to a payload.
#[derive(Debug, Clone, Default)]
pub struct BatchReaderBuilder {
    pub(crate) config: ReaderConfig,
    pub(crate) debug_enabled: bool,
}

impl BatchReaderBuilder {
    /// Builder that accepts either batch mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a batch of requests
    #[must_use]
    pub fn requests() -> Self {
        Self::new().mode(BatchMode::Requests)
    }

    /// Builder for a batch of responses
    #[must_use]
    pub fn responses() -> Self {
        Self::new().mode(BatchMode::Responses)
    }

    /// Builder that detects the mode from the payload
    #[must_use]
    pub fn auto() -> Self {
        Self::new().mode(BatchMode::Auto)
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            debug_enabled: false,
        }
    }

    /// Start from a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document does not parse.
    pub fn from_config_json(document: &str) -> Result<Self> {
        Ok(Self::with_config(ReaderConfig::from_json(document)?))
    }

    /// Tight limits for untrusted producers
    #[must_use]
    pub fn strict(self) -> Self {
        Self {
            config: ReaderConfig::strict().with_mode(self.config.mode),
            ..self
        }
    }

    /// Generous limits for trusted producers
    #[must_use]
    pub fn permissive(self) -> Self {
        Self {
            config: ReaderConfig::permissive().with_mode(self.config.mode),
            ..self
        }
    }

    /// Log the effective configuration when a reader is built
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// The configuration collected so far
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}
