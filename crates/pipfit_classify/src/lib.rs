//! Switch classification for routing pips.
//!
//! A [`PipClassifier`] maps a directed pip, given as its two wire endpoints,
//! to the [`SwitchClass`] whose delay parameters it shares. Pips that no
//! class covers, and pips whose class is in the [`ZeroDelaySet`], stay out
//! of the delay model.

#![warn(missing_docs)]

pub mod class;
pub mod error;
pub mod rules;

pub use class::{SwitchClass, WireRef, ZeroDelaySet};
pub use error::ClassifyError;
pub use rules::RuleClassifier;

/// Assigns switch classes to pips.
pub trait PipClassifier {
    /// Returns the class of the pip `src -> dst`, or `None` if the pip is
    /// not modeled.
    fn classify(&self, src: WireRef<'_>, dst: WireRef<'_>) -> Option<SwitchClass>;
}
