//! `pipfit solve`: the fitting pipeline.
//!
//! 1. Load `pipfit.toml` (or defaults) and apply command-line overrides
//! 2. Compile the classifier rules
//! 3. For each design: load its route dump and SDF, add its rows
//! 4. Eliminate, solve and print the report

use std::path::Path;

use pipfit_classify::{RuleClassifier, ZeroDelaySet};
use pipfit_diagnostics::DiagnosticSink;
use pipfit_model::{FitReport, ModelBuilder};
use pipfit_route::RouteDump;
use pipfit_sdf::SdfFile;

use crate::pipeline::{collect_designs, render_diagnostics, resolve_config};
use crate::{GlobalArgs, ReportFormat, SolveArgs};

/// Runs the `pipfit solve` command.
///
/// The report goes to stdout, status lines and diagnostics to stderr.
/// Returns exit code 0; every failure is an error.
pub fn run(args: &SolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let sink = DiagnosticSink::new();
    let result = fit(args, global, &cwd, &sink);
    render_diagnostics(&sink.take_all(), global, args.format);
    let report = result?;

    match args.format {
        ReportFormat::Text => print!("{}", report.to_text()),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    if !global.quiet {
        eprintln!(
            "    Finished {} variable(s) from {} row(s), {} eliminated",
            report.estimates.len(),
            report.data_rows,
            report.constraint_rows
        );
    }
    Ok(0)
}

/// Builds and solves the model for every configured design.
fn fit(
    args: &SolveArgs,
    global: &GlobalArgs,
    cwd: &Path,
    sink: &DiagnosticSink,
) -> Result<FitReport, Box<dyn std::error::Error>> {
    let mut config = resolve_config(global, cwd)?;
    if let Some(ref top) = args.top {
        config.fit.top_scope = top.clone();
    }
    let designs = collect_designs(&config.designs, &args.designs)?;
    let classifier = RuleClassifier::from_config(&config.classifier)?;
    let zero_delay: ZeroDelaySet = config
        .fit
        .zero_delay_classes
        .iter()
        .chain(&args.zero_delay)
        .cloned()
        .collect();

    let mut model = ModelBuilder::new(config.fit.top_scope.clone(), zero_delay);
    for design in &designs {
        if !global.quiet {
            eprintln!("     Loading {}", design.route.display());
        }
        let routing = RouteDump::load(&design.route)?;
        let sdf = SdfFile::parse_file(&design.sdf)?;
        if global.verbose && !global.quiet {
            eprintln!(
                "        Read {} pip(s), {} interconnect annotation(s)",
                routing.pip_count(),
                sdf.interconnect_count()
            );
        }
        let stats = model.add_design(&routing, &sdf, &classifier, sink)?;
        if global.verbose && !global.quiet {
            eprintln!(
                "       Added {} row(s) from {} of {} observation(s)",
                stats.rows, stats.matched, stats.observations
            );
        }
    }

    if !global.quiet {
        eprintln!(
            "     Solving {} variable(s), {} row(s)",
            model.registry().len(),
            model.rows().len()
        );
    }
    Ok(model.finish(&config.solver, sink))
}
