//! Interconnect delay model: from routed arcs and annotated delays to fitted
//! per-switch-class parameters.
//!
//! For each design, annotated `INTERCONNECT` delays are matched against the
//! reconstructed routing ([`correlate`]), each matched arc becomes one
//! equation over the `base` and `fanout_adder` variables of the switch
//! classes on its path ([`assemble`]), and after all designs the system is
//! cleaned of unidentifiable variables ([`eliminate`]) and solved with LSQR
//! ([`lsqr`]).
//!
//! ```ignore
//! let mut model = ModelBuilder::new("top", zero_delay);
//! for (route, sdf) in designs {
//!     model.add_design(&route, &sdf, &classifier, &sink)?;
//! }
//! print!("{}", model.finish(&solver_config, &sink).to_text());
//! ```

#![warn(missing_docs)]

pub mod assemble;
pub mod correlate;
pub mod eliminate;
pub mod error;
pub mod lsqr;
pub mod registry;
pub mod report;
pub mod sparse;

pub use assemble::{DesignStats, EquationRow, ModelBuilder};
pub use correlate::{correlate, CorrelatedArc, Correlation};
pub use eliminate::{build_system, eliminated_variables, LinearSystem, MaxClassFanout};
pub use error::{FitError, FitResult};
pub use lsqr::{lsqr, LsqrOutcome, StopReason};
pub use registry::{CoeffKind, VarId, Variable, VariableRegistry};
pub use report::{Estimate, FitReport, SolverStats};
pub use sparse::CscMatrix;
