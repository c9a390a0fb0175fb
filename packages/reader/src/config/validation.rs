//! Configuration validation

use super::ReaderConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid size limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),

    #[error("Invalid configuration document: {0}")]
    Parse(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidLimit` - if a count or size limit is zero
    /// - `InvalidBufferSize` - if the refill size is zero or above 16MB
    /// - `Conflict` - if limits contradict each other
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a limit is non-zero
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidLimit` if `value` is zero.
    pub fn validate_limit(value: usize, name: &str) -> ConfigResult<()> {
        if value == 0 {
            return Err(ConfigurationError::InvalidLimit(format!(
                "{name} cannot be zero"
            )));
        }
        Ok(())
    }

    /// Validate a buffer size
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidBufferSize` if the size is zero
    /// or larger than 16MB.
    pub fn validate_buffer_size(size: usize, name: &str) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigurationError::InvalidBufferSize(format!(
                "{name} cannot be zero"
            )));
        }
        if size > 16 * 1024 * 1024 {
            return Err(ConfigurationError::InvalidBufferSize(format!(
                "{name} cannot exceed 16MB"
            )));
        }
        Ok(())
    }
}

impl Validator for ReaderConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_limit(self.max_message_size, "max_message_size")?;
        ConfigValidator::validate_limit(self.max_parts_per_batch, "max_parts_per_batch")?;
        ConfigValidator::validate_limit(
            self.max_operations_per_changeset,
            "max_operations_per_changeset",
        )?;
        ConfigValidator::validate_limit(self.max_nesting_depth, "max_nesting_depth")?;
        ConfigValidator::validate_buffer_size(self.read_chunk_size, "read_chunk_size")?;

        // items sit two levels deep and their headers/body one more
        if self.max_nesting_depth < 4 {
            return Err(ConfigurationError::Conflict(format!(
                "max_nesting_depth {} cannot hold a batch item with a body",
                self.max_nesting_depth
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ReaderConfig::default().validate(), Ok(()));
        assert_eq!(ReaderConfig::strict().validate(), Ok(()));
        assert_eq!(ReaderConfig::permissive().validate(), Ok(()));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let config = ReaderConfig::default().with_max_message_size(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidLimit(_))
        ));

        let config = ReaderConfig::default().with_read_chunk_size(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidBufferSize(_))
        ));
    }

    #[test]
    fn shallow_nesting_conflicts() {
        let config = ReaderConfig::default().with_max_nesting_depth(3);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::Conflict(_))
        ));
    }
}
