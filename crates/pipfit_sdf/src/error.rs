//! SDF reader errors.

/// Errors produced while reading an SDF file.
#[derive(Debug, thiserror::Error)]
pub enum SdfError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that was being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input does not follow SDF structure.
    #[error("SDF syntax error at byte {pos}: {message}")]
    Syntax {
        /// Byte offset of the offending token.
        pos: usize,
        /// What was expected.
        message: String,
    },

    /// The input ended inside an open construct.
    #[error("SDF ended unexpectedly")]
    UnexpectedEof,

    /// A delay value is not a number.
    #[error("SDF bad number `{text}` at byte {pos}")]
    BadNumber {
        /// Byte offset of the value.
        pos: usize,
        /// The text that failed to parse.
        text: String,
    },

    /// The `TIMESCALE` header is not understood.
    #[error("SDF bad timescale `{0}`")]
    BadTimescale(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_syntax() {
        let err = SdfError::Syntax {
            pos: 12,
            message: "expected '('".to_string(),
        };
        assert_eq!(format!("{err}"), "SDF syntax error at byte 12: expected '('");
    }

    #[test]
    fn display_bad_number() {
        let err = SdfError::BadNumber {
            pos: 3,
            text: "1.x".to_string(),
        };
        assert_eq!(format!("{err}"), "SDF bad number `1.x` at byte 3");
    }
}
