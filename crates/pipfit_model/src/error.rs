//! Errors that abort a fitting run.

use pipfit_classify::ClassifyError;
use pipfit_common::NameError;
use pipfit_config::ConfigError;
use pipfit_route::RouteError;
use pipfit_sdf::SdfError;

/// Result alias for fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Any fatal error of a run. Nothing is recovered: the run stops at the
/// first one.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unreadable or malformed annotation file.
    #[error(transparent)]
    Sdf(#[from] SdfError),

    /// Unreadable or malformed routing.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A malformed port name in the annotation.
    #[error("bad annotation port name: {0}")]
    Name(#[from] NameError),

    /// Classifier rules that do not compile.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// The annotation has no cell for the configured top scope.
    #[error("annotation for design `{design}` has no cell `{scope}`")]
    MissingScope {
        /// Design name.
        design: String,
        /// The scope that was looked up.
        scope: String,
    },
}
