//! Equation assembly across designs.
//!
//! [`ModelBuilder`] owns all state that accumulates over a run: the variable
//! registry, the per-class maximum fanout and the equation rows. Designs are
//! fed in one at a time with [`ModelBuilder::add_design`]; after the last one
//! [`ModelBuilder::finish`] eliminates unidentifiable variables and solves.

use crate::correlate::{correlate, CorrelatedArc};
use crate::eliminate::{build_system, eliminated_variables, MaxClassFanout};
use crate::error::{FitError, FitResult};
use crate::lsqr::lsqr;
use crate::registry::{CoeffKind, VarId, VariableRegistry};
use crate::report::FitReport;
use pipfit_classify::{PipClassifier, WireRef, ZeroDelaySet};
use pipfit_common::{CollapsedDelay, Interner};
use pipfit_config::SolverConfig;
use pipfit_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use pipfit_route::{reconstruct_design, FanoutTable, RoutedDesign, RoutingSource};
use pipfit_sdf::{InterconnectMap, SdfFile};
use std::collections::BTreeMap;

/// One observation equation: `Σ coeff · x[var] = target.max`.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationRow {
    /// Coefficients by variable, sorted by id, no zero entries.
    pub coeffs: Vec<(VarId, u32)>,
    /// Collapsed observed delay. Only `max` is fitted.
    pub target: CollapsedDelay,
    /// `design: src -> dst`, for messages.
    pub origin: String,
}

/// Counts for one design added to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DesignStats {
    /// Nets with routing.
    pub nets: usize,
    /// Arcs recovered from the routing.
    pub arcs: usize,
    /// Interconnect observations in the annotation scope.
    pub observations: usize,
    /// Observations matched to an arc.
    pub matched: usize,
    /// Rows appended to the system.
    pub rows: usize,
}

/// Accumulates equations over every design of one run.
pub struct ModelBuilder {
    interner: Interner,
    top_scope: String,
    zero_delay: ZeroDelaySet,
    registry: VariableRegistry,
    max_fanout: MaxClassFanout,
    rows: Vec<EquationRow>,
}

impl ModelBuilder {
    /// Creates a builder reading delays from the `top_scope` annotation cell.
    pub fn new(top_scope: impl Into<String>, zero_delay: ZeroDelaySet) -> Self {
        Self {
            interner: Interner::new(),
            top_scope: top_scope.into(),
            zero_delay,
            registry: VariableRegistry::new(),
            max_fanout: MaxClassFanout::new(),
            rows: Vec::new(),
        }
    }

    /// The wire-name interner shared by all designs.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Registered variables.
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Assembled rows, in assembly order.
    pub fn rows(&self) -> &[EquationRow] {
        &self.rows
    }

    /// Maximum fanout seen per class.
    pub fn max_fanout(&self) -> &MaxClassFanout {
        &self.max_fanout
    }

    /// Reconstructs a design's routing and adds a row for every annotated
    /// arc that was routed.
    pub fn add_design(
        &mut self,
        routing: &dyn RoutingSource,
        sdf: &SdfFile,
        classifier: &dyn PipClassifier,
        sink: &DiagnosticSink,
    ) -> FitResult<DesignStats> {
        let design = reconstruct_design(routing, &self.interner)?;
        let observations =
            sdf.interconnects(&self.top_scope)
                .ok_or_else(|| FitError::MissingScope {
                    design: design.name.clone(),
                    scope: self.top_scope.clone(),
                })?;
        self.add_routed(&design, &observations, classifier, sink)
    }

    /// Adds rows for an already reconstructed design.
    pub fn add_routed(
        &mut self,
        design: &RoutedDesign,
        observations: &InterconnectMap,
        classifier: &dyn PipClassifier,
        sink: &DiagnosticSink,
    ) -> FitResult<DesignStats> {
        for md in &design.multi_driven {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::MULTI_DRIVER,
                    format!(
                        "wire {} has more than one driver",
                        md.conflict.node.display(&self.interner)
                    ),
                )
                .with_subject(format!("{}: net {}", design.name, md.net))
                .with_note(format!(
                    "driver {} replaced by {}",
                    md.conflict.replaced.display(&self.interner),
                    md.conflict.kept.display(&self.interner)
                ))
                .with_help("multi-driver nets are not supported; the last pip wins"),
            );
        }

        let correlation = correlate(&design.arcs, observations)?;
        if !correlation.dropped.is_empty() {
            let mut diag = Diagnostic::note(
                DiagnosticCode::UNMATCHED_ARCS,
                format!(
                    "{} of {} interconnect observations have no routed arc",
                    correlation.dropped.len(),
                    observations.len()
                ),
            )
            .with_subject(design.name.clone());
            if let Some((src, dst)) = correlation.dropped.first() {
                diag = diag.with_note(format!("first unmatched: {src} -> {dst}"));
            }
            sink.emit(diag);
        }

        let mut stats = DesignStats {
            nets: design.routed_nets,
            arcs: design.arcs.len(),
            observations: observations.len(),
            matched: correlation.matched.len(),
            rows: 0,
        };
        for arc in &correlation.matched {
            let row = self.assemble_row(&design.name, arc, &design.fanout, classifier);
            if row.coeffs.is_empty() && row.target.max != 0.0 {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::DEGENERATE_ROW,
                        format!(
                            "no modeled switch on a path with delay {} ps",
                            row.target.max
                        ),
                    )
                    .with_subject(row.origin.clone())
                    .with_note("the row is kept and only adds to the residual"),
                );
            }
            self.rows.push(row);
            stats.rows += 1;
        }

        sink.emit(
            Diagnostic::note(
                DiagnosticCode::ROUTE_SUMMARY,
                format!(
                    "{} nets, {} arcs, {} of {} observations matched",
                    stats.nets, stats.arcs, stats.matched, stats.observations
                ),
            )
            .with_subject(design.name.clone()),
        );
        Ok(stats)
    }

    /// Builds the row of one correlated arc and updates the class fanout
    /// maxima. Does not append it.
    pub fn assemble_row(
        &mut self,
        design: &str,
        arc: &CorrelatedArc<'_>,
        fanout: &FanoutTable,
        classifier: &dyn PipClassifier,
    ) -> EquationRow {
        let mut coeffs: BTreeMap<VarId, u32> = BTreeMap::new();
        for pip in arc.path {
            let src = WireRef::resolve(pip.src, &self.interner);
            let dst = WireRef::resolve(pip.dst, &self.interner);
            let Some(class) = classifier.classify(src, dst) else {
                continue;
            };
            if self.zero_delay.contains(&class) {
                continue;
            }
            let base = self.registry.get_or_insert(&class, CoeffKind::Base);
            *coeffs.entry(base).or_insert(0) += 1;

            let adder = self.registry.get_or_insert(&class, CoeffKind::FanoutAdder);
            let f = fanout.fanout_of(pip.src);
            self.max_fanout.record(&class, f);
            *coeffs.entry(adder).or_insert(0) += f;
        }
        EquationRow {
            coeffs: coeffs.into_iter().collect(),
            target: arc.delay.collapse(),
            origin: format!("{design}: {} -> {}", arc.src, arc.dst),
        }
    }

    /// Eliminates unidentifiable adders, solves, and reports.
    pub fn finish(self, config: &SolverConfig, sink: &DiagnosticSink) -> FitReport {
        let eliminated = eliminated_variables(&self.max_fanout, &self.registry);
        if !eliminated.is_empty() {
            let names: Vec<String> = eliminated
                .iter()
                .map(|&id| self.registry.variable(id).class.to_string())
                .collect();
            sink.emit(
                Diagnostic::note(
                    DiagnosticCode::ELIMINATED,
                    format!(
                        "{} fanout_adder variables pinned to zero (fanout never above 1)",
                        eliminated.len()
                    ),
                )
                .with_note(format!("classes: {}", names.join(", "))),
            );
        }

        let system = build_system(&self.rows, self.registry.len(), &eliminated);
        let outcome = lsqr(&system.matrix, &system.rhs, config);

        let stats = format!(
            "{} after {} iterations, residual {:.3}, cond {:.3e}",
            outcome.stop, outcome.iterations, outcome.r1norm, outcome.acond
        );
        if outcome.stop.converged() {
            sink.emit(Diagnostic::note(DiagnosticCode::SOLVER_STATS, stats));
        } else {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::NOT_CONVERGED,
                    "least-squares solve stopped before converging",
                )
                .with_note(stats)
                .with_help("raise solver.max_iterations or solver.conlim in pipfit.toml"),
            );
        }

        FitReport::new(&self.registry, &system, &outcome)
    }
}
