//! Fitted delay parameters and how to print them.

use crate::eliminate::LinearSystem;
use crate::lsqr::{LsqrOutcome, StopReason};
use crate::registry::{CoeffKind, VariableRegistry};
use pipfit_classify::SwitchClass;
use serde::Serialize;
use std::fmt::Write;

/// One solved parameter.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    /// Switch class.
    pub class: SwitchClass,
    /// Parameter kind.
    pub kind: CoeffKind,
    /// Fitted delay in picoseconds.
    pub value: f64,
    /// Whether the variable was pinned to zero.
    pub eliminated: bool,
}

/// Solver statistics carried into the report.
#[derive(Debug, Clone, Serialize)]
pub struct SolverStats {
    /// Why LSQR stopped.
    pub stop: StopReason,
    /// LSQR `istop` code.
    pub stop_code: u8,
    /// Iterations performed.
    pub iterations: usize,
    /// Residual norm.
    pub r1norm: f64,
    /// Damped residual norm.
    pub r2norm: f64,
    /// Matrix norm estimate.
    pub anorm: f64,
    /// Condition number estimate.
    pub acond: f64,
    /// Normal-equation residual norm.
    pub arnorm: f64,
    /// Solution norm.
    pub xnorm: f64,
}

impl From<&LsqrOutcome> for SolverStats {
    fn from(o: &LsqrOutcome) -> Self {
        Self {
            stop: o.stop,
            stop_code: o.stop.code(),
            iterations: o.iterations,
            r1norm: o.r1norm,
            r2norm: o.r2norm,
            anorm: o.anorm,
            acond: o.acond,
            arnorm: o.arnorm,
            xnorm: o.xnorm,
        }
    }
}

/// The result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    /// Estimates ordered by `(class, kind)`.
    pub estimates: Vec<Estimate>,
    /// Data rows in the system.
    pub data_rows: usize,
    /// Elimination constraint rows in the system.
    pub constraint_rows: usize,
    /// Solver statistics.
    pub solver: SolverStats,
}

impl FitReport {
    /// Pairs each registered variable with its solved value.
    pub fn new(registry: &VariableRegistry, system: &LinearSystem, outcome: &LsqrOutcome) -> Self {
        let estimates = registry
            .sorted()
            .into_iter()
            .map(|(id, var)| Estimate {
                class: var.class.clone(),
                kind: var.kind,
                value: outcome.x.get(id.index()).copied().unwrap_or(0.0),
                eliminated: system.eliminated.contains(&id),
            })
            .collect();
        Self {
            estimates,
            data_rows: system.data_rows,
            constraint_rows: system.constraint_rows(),
            solver: SolverStats::from(outcome),
        }
    }

    /// Looks up a solved value.
    pub fn value(&self, class: &str, kind: CoeffKind) -> Option<f64> {
        self.estimates
            .iter()
            .find(|e| e.class.as_str() == class && e.kind == kind)
            .map(|e| e.value)
    }

    /// Fixed-width text: class, kind and rounded value per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for e in &self.estimates {
            let _ = writeln!(
                out,
                "{:40} {:20} {:6.0}",
                e.class.as_str(),
                e.kind.label(),
                e.value
            );
        }
        out
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eliminate::build_system;
    use crate::registry::VarId;

    fn report() -> FitReport {
        let mut reg = VariableRegistry::new();
        reg.get_or_insert(&SwitchClass::new("V06"), CoeffKind::Base);
        reg.get_or_insert(&SwitchClass::new("H02"), CoeffKind::FanoutAdder);
        reg.get_or_insert(&SwitchClass::new("H02"), CoeffKind::Base);
        let system = build_system(&[], 3, &[VarId::from_raw(1)]);
        let outcome = LsqrOutcome {
            x: vec![61.4, 0.0, 123.6],
            stop: StopReason::Compatible,
            iterations: 3,
            r1norm: 0.5,
            r2norm: 0.5,
            anorm: 2.0,
            acond: 4.0,
            arnorm: 0.0,
            xnorm: 1.0,
        };
        FitReport::new(&reg, &system, &outcome)
    }

    #[test]
    fn estimates_sorted_by_class_and_kind() {
        let r = report();
        let order: Vec<_> = r
            .estimates
            .iter()
            .map(|e| (e.class.as_str(), e.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                ("H02", CoeffKind::Base),
                ("H02", CoeffKind::FanoutAdder),
                ("V06", CoeffKind::Base),
            ]
        );
        assert!(r.estimates[1].eliminated);
        assert!(!r.estimates[0].eliminated);
    }

    #[test]
    fn text_layout() {
        let text = report().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            format!("{:40} {:20} {:>6}", "H02", "base", "124")
        );
        assert_eq!(lines[1].len(), 40 + 1 + 20 + 1 + 6);
        assert!(lines[2].ends_with("    61"));
    }

    #[test]
    fn value_lookup() {
        let r = report();
        assert_eq!(r.value("V06", CoeffKind::Base), Some(61.4));
        assert_eq!(r.value("V06", CoeffKind::FanoutAdder), None);
    }

    #[test]
    fn json_has_labels() {
        let json = report().to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["estimates"][0]["class"], "H02");
        assert_eq!(v["estimates"][1]["kind"], "fanout_adder");
        assert_eq!(v["solver"]["stop"], "compatible");
        assert_eq!(v["constraint_rows"], 1);
    }
}
