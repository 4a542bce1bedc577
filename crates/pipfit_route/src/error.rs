//! Routing input errors.

use pipfit_common::NameError;

/// Errors produced while loading or reconstructing routing.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The route file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that was being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The route file is not valid route-dump JSON.
    #[error("route dump JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A wire name in the routing could not be decomposed.
    #[error("net `{net}`: {source}")]
    Name {
        /// The net containing the bad wire.
        net: String,
        /// The format error.
        source: NameError,
    },
}
