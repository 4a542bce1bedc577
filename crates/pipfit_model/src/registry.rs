//! Solved variables and their dense column indices.
//!
//! Each switch class contributes up to two unknowns: a per-traversal `base`
//! delay and a per-unit-fanout `fanout_adder` delay. A variable gets the next
//! free [`VarId`] the first time any row references it; ids never change or
//! disappear for the rest of the run.

use pipfit_classify::SwitchClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Column index of a variable in the solved system.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct VarId(u32);

impl VarId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// The index as a column number.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which delay parameter of a class a variable stands for.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoeffKind {
    /// Fixed delay per traversal.
    Base,
    /// Extra delay per unit of source-wire fanout.
    FanoutAdder,
}

impl CoeffKind {
    /// The label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            CoeffKind::Base => "base",
            CoeffKind::FanoutAdder => "fanout_adder",
        }
    }
}

impl fmt::Display for CoeffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A solved unknown: one delay parameter of one switch class.
///
/// Orders by class, then kind.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Variable {
    /// The switch class.
    pub class: SwitchClass,
    /// The parameter kind.
    pub kind: CoeffKind,
}

impl Variable {
    /// Creates a variable.
    pub fn new(class: SwitchClass, kind: CoeffKind) -> Self {
        Self { class, kind }
    }
}

/// Insertion-ordered map from [`Variable`] to [`VarId`].
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    index: HashMap<Variable, VarId>,
}

impl VariableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `(class, kind)`, registering it if unseen.
    pub fn get_or_insert(&mut self, class: &SwitchClass, kind: CoeffKind) -> VarId {
        let var = Variable::new(class.clone(), kind);
        if let Some(&id) = self.index.get(&var) {
            return id;
        }
        let id = VarId::from_raw(self.variables.len() as u32);
        self.variables.push(var.clone());
        self.index.insert(var, id);
        id
    }

    /// Looks up `(class, kind)` without registering it.
    pub fn get(&self, class: &SwitchClass, kind: CoeffKind) -> Option<VarId> {
        self.index.get(&Variable::new(class.clone(), kind)).copied()
    }

    /// The variable behind `id`.
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables in id order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VarId::from_raw(i as u32), v))
    }

    /// Variables ordered by `(class, kind)`.
    pub fn sorted(&self) -> Vec<(VarId, &Variable)> {
        let mut vars: Vec<_> = self.iter().collect();
        vars.sort_by(|a, b| a.1.cmp(b.1));
        vars
    }
}
