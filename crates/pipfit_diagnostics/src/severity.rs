//! Diagnostic severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How loudly a diagnostic should be reported.
///
/// Ordered from least to most severe. Fatal problems never become
/// diagnostics; they abort the run as errors instead, so there is no
/// error level here.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Progress detail, shown only with `--verbose`.
    Note,
    /// Something the user should look at; the fit is still produced.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
