//! Pinning unidentifiable fanout adders to zero and building the final
//! sparse system.
//!
//! When every observation of a class saw fanout 1, its `fanout_adder`
//! coefficient always equals its `base` coefficient, so only their sum is
//! determined. Such adders are dropped from every data row and forced to
//! zero by one extra `x = 0` row each, which keeps them in the output.

use crate::assemble::EquationRow;
use crate::registry::{CoeffKind, VarId, VariableRegistry};
use crate::sparse::CscMatrix;
use pipfit_classify::SwitchClass;
use std::collections::{BTreeMap, BTreeSet};

/// Largest fanout ever fed into each class's `fanout_adder`, over all
/// designs of a run.
#[derive(Debug, Clone, Default)]
pub struct MaxClassFanout {
    max: BTreeMap<SwitchClass, u32>,
}

impl MaxClassFanout {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the class maximum to `fanout` if it is larger.
    pub fn record(&mut self, class: &SwitchClass, fanout: u32) {
        match self.max.get_mut(class) {
            Some(m) => *m = (*m).max(fanout),
            None => {
                self.max.insert(class.clone(), fanout);
            }
        }
    }

    /// The recorded maximum, if the class was ever seen.
    pub fn get(&self, class: &SwitchClass) -> Option<u32> {
        self.max.get(class).copied()
    }

    /// Classes and their maxima, ordered by class.
    pub fn iter(&self) -> impl Iterator<Item = (&SwitchClass, u32)> {
        self.max.iter().map(|(c, &m)| (c, m))
    }
}

/// The `fanout_adder` variables of every class whose maximum fanout is
/// exactly 1, in id order.
pub fn eliminated_variables(max_fanout: &MaxClassFanout, registry: &VariableRegistry) -> Vec<VarId> {
    let set: BTreeSet<VarId> = max_fanout
        .iter()
        .filter(|&(_, max)| max == 1)
        .filter_map(|(class, _)| registry.get(class, CoeffKind::FanoutAdder))
        .collect();
    set.into_iter().collect()
}

/// The assembled least-squares problem.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// Data rows followed by one constraint row per eliminated variable.
    pub matrix: CscMatrix,
    /// Row targets; zero for constraint rows.
    pub rhs: Vec<f64>,
    /// Number of data rows.
    pub data_rows: usize,
    /// Eliminated variables, in id order.
    pub eliminated: Vec<VarId>,
}

impl LinearSystem {
    /// Number of constraint rows.
    pub fn constraint_rows(&self) -> usize {
        self.eliminated.len()
    }
}

/// Builds `A` and `b` from the data rows, leaving out eliminated
/// coefficients and appending their `x = 0` rows.
pub fn build_system(rows: &[EquationRow], columns: usize, eliminated: &[VarId]) -> LinearSystem {
    let skip: BTreeSet<VarId> = eliminated.iter().copied().collect();
    let mut triplets = Vec::new();
    let mut rhs = Vec::with_capacity(rows.len() + eliminated.len());
    for (i, row) in rows.iter().enumerate() {
        for &(var, coeff) in &row.coeffs {
            if skip.contains(&var) {
                continue;
            }
            triplets.push((i, var.index(), f64::from(coeff)));
        }
        rhs.push(row.target.max);
    }
    for (k, var) in eliminated.iter().enumerate() {
        triplets.push((rows.len() + k, var.index(), 1.0));
        rhs.push(0.0);
    }
    let matrix = CscMatrix::from_triplets(rhs.len(), columns, &triplets);
    LinearSystem {
        matrix,
        rhs,
        data_rows: rows.len(),
        eliminated: eliminated.to_vec(),
    }
}
