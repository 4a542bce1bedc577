//! Shared foundational types used across the pipfit workspace.
//!
//! This crate provides identifier normalization for annotation port names and
//! routing wire names, interned wire-name identifiers, the delay records that
//! flow from timing annotations into the model, and the format error type.

#![warn(missing_docs)]

pub mod delay;
pub mod error;
pub mod ident;
pub mod naming;

pub use delay::{CollapsedDelay, DelayTriple, EdgeDelays};
pub use error::NameError;
pub use ident::{Ident, Interner};
pub use naming::{decompose_wire, split_port, unescape_name, PinRef, WireNode};
