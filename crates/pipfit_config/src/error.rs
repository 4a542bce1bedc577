//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `pipfit.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A classifier rule is malformed.
    #[error("classifier rule {index}: {message}")]
    InvalidRule {
        /// Zero-based position of the rule in `[[classifier.rules]]`.
        index: usize,
        /// What is wrong with it.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_invalid_rule() {
        let err = ConfigError::InvalidRule {
            index: 2,
            message: "empty class".to_string(),
        };
        assert_eq!(format!("{err}"), "classifier rule 2: empty class");
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("solver.atol must be >= 0".to_string());
        assert_eq!(format!("{err}"), "validation error: solver.atol must be >= 0");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::from(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
