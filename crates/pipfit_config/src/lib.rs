//! Parsing and validation of `pipfit.toml` run configuration.
//!
//! The configuration names the annotation scope to read, the switch classes
//! that are zero-delay by definition, the classification rules, the solver
//! tolerances, and optionally the list of designs to fit.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
