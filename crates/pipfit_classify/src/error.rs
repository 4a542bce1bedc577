//! Classifier construction errors.

/// Errors produced while building a classifier from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// A rule pattern is not a valid regular expression.
    #[error("classifier rule {index}: invalid pattern `{pattern}`: {source}")]
    BadPattern {
        /// Zero-based rule index.
        index: usize,
        /// The offending pattern.
        pattern: String,
        /// The regex compile error.
        source: regex::Error,
    },
}
