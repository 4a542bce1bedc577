//! Structured diagnostics for a fitting run.
//!
//! Every stage of the pipeline reports notable events (dropped observations,
//! multi-driver nets, degenerate rows, solver stop reasons) as [`Diagnostic`]
//! values into a shared [`DiagnosticSink`]. The CLI renders them on stderr
//! through a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
