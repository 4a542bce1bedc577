//! Delay records carried from timing annotations into equation rows.
//!
//! All values are in picoseconds.

use serde::{Deserialize, Serialize};

/// A `(min:typ:max)` delay triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DelayTriple {
    /// Minimum (fast corner) delay.
    pub min: f64,
    /// Typical delay.
    pub typ: f64,
    /// Maximum (slow corner) delay.
    pub max: f64,
}

impl DelayTriple {
    /// Creates a triple from its three corners.
    pub fn new(min: f64, typ: f64, max: f64) -> Self {
        Self { min, typ, max }
    }

    /// Creates a triple with the same value at every corner.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Multiplies every corner by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.min * factor, self.typ * factor, self.max * factor)
    }
}

/// Rising and falling delays for one interconnect observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeDelays {
    /// Delay of a rising transition.
    pub rising: DelayTriple,
    /// Delay of a falling transition.
    pub falling: DelayTriple,
}

impl EdgeDelays {
    /// Creates an edge pair.
    pub fn new(rising: DelayTriple, falling: DelayTriple) -> Self {
        Self { rising, falling }
    }

    /// Collapses rising and falling into one triple.
    ///
    /// Rising and falling interconnect delays are not modeled separately:
    /// `min` takes the smaller of the two minimums, `typ` and `max` the larger
    /// of the two.
    pub fn collapse(&self) -> CollapsedDelay {
        CollapsedDelay {
            min: self.rising.min.min(self.falling.min),
            typ: self.rising.typ.max(self.falling.typ),
            max: self.rising.max.max(self.falling.max),
        }
    }
}

/// The single-edge target of an equation row.
///
/// Only [`max`](Self::max) is fitted today; `min` and `typ` are kept with the
/// row so the information is not lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollapsedDelay {
    /// Smallest minimum over both edges.
    pub min: f64,
    /// Largest typical value over both edges.
    pub typ: f64,
    /// Largest maximum over both edges.
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_picks_worst_edges() {
        let d = EdgeDelays::new(
            DelayTriple::new(1.0, 5.0, 9.0),
            DelayTriple::new(2.0, 6.0, 8.0),
        );
        let c = d.collapse();
        assert_eq!(c.min, 1.0);
        assert_eq!(c.typ, 6.0);
        assert_eq!(c.max, 9.0);
    }

    #[test]
    fn collapse_uniform_edges() {
        let d = EdgeDelays::new(DelayTriple::uniform(5.0), DelayTriple::uniform(7.0));
        let c = d.collapse();
        assert_eq!(c.min, 5.0);
        assert_eq!(c.typ, 7.0);
        assert_eq!(c.max, 7.0);
    }

    #[test]
    fn scaled_triple() {
        let t = DelayTriple::new(0.1, 0.2, 0.3).scaled(1000.0);
        assert!((t.min - 100.0).abs() < 1e-9);
        assert!((t.typ - 200.0).abs() < 1e-9);
        assert!((t.max - 300.0).abs() < 1e-9);
    }

    #[test]
    fn serde_roundtrip() {
        let d = EdgeDelays::new(DelayTriple::uniform(3.0), DelayTriple::new(1.0, 2.0, 4.0));
        let json = serde_json::to_string(&d).unwrap();
        let back: EdgeDelays = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
