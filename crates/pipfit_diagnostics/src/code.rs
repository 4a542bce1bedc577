//! Diagnostic codes, one prefix letter per pipeline stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage a diagnostic comes from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Route-tree reconstruction, prefixed with `R`.
    Routing,
    /// Timing annotation correlation, prefixed with `A`.
    Annotation,
    /// Equation assembly and elimination, prefixed with `M`.
    Model,
    /// Least-squares solve, prefixed with `S`.
    Solver,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Routing => 'R',
            Category::Annotation => 'A',
            Category::Model => 'M',
            Category::Solver => 'S',
        }
    }
}

/// A stage prefix plus a number, displayed as e.g. `R001` or `S002`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The stage this diagnostic belongs to.
    pub category: Category,
    /// The numeric identifier within the stage.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// A net drives one wire from more than one source.
    pub const MULTI_DRIVER: Self = Self::new(Category::Routing, 1);
    /// Per-design reconstruction summary.
    pub const ROUTE_SUMMARY: Self = Self::new(Category::Routing, 2);
    /// Annotation observations with no routed arc.
    pub const UNMATCHED_ARCS: Self = Self::new(Category::Annotation, 1);
    /// A row with no coefficients but a non-zero target.
    pub const DEGENERATE_ROW: Self = Self::new(Category::Model, 1);
    /// Fanout-adder variables pinned to zero.
    pub const ELIMINATED: Self = Self::new(Category::Model, 2);
    /// The solver stopped without converging.
    pub const NOT_CONVERGED: Self = Self::new(Category::Solver, 1);
    /// Solver statistics.
    pub const SOLVER_STATS: Self = Self::new(Category::Solver, 2);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
