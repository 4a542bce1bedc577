//! Shared helpers for CLI commands: configuration discovery, design list
//! assembly and diagnostic output.

use std::path::{Path, PathBuf};

use pipfit_config::{DesignSpec, FitConfig};
use pipfit_diagnostics::{
    Diagnostic, DiagnosticRenderer, JsonRenderer, Severity, TerminalRenderer,
};

use crate::{GlobalArgs, ReportFormat};

/// Configuration file picked up from the working directory when `--config`
/// is not given.
pub const CONFIG_FILE: &str = "pipfit.toml";

/// Loads the run configuration.
///
/// `--config` must name an existing file. Without it, `pipfit.toml` in `cwd`
/// is used if present, and built-in defaults otherwise.
pub fn resolve_config(
    global: &GlobalArgs,
    cwd: &Path,
) -> Result<FitConfig, Box<dyn std::error::Error>> {
    if let Some(ref path) = global.config {
        return Ok(pipfit_config::load_config(Path::new(path))?);
    }
    let local = cwd.join(CONFIG_FILE);
    if local.is_file() {
        Ok(pipfit_config::load_config(&local)?)
    } else {
        Ok(FitConfig::default())
    }
}

/// Appends the positional `ROUTE SDF` pairs to the configured designs.
pub fn collect_designs(
    configured: &[DesignSpec],
    positional: &[String],
) -> Result<Vec<DesignSpec>, Box<dyn std::error::Error>> {
    if positional.len() % 2 != 0 {
        return Err(format!(
            "designs are given as ROUTE SDF pairs, got {} path(s)",
            positional.len()
        )
        .into());
    }
    let mut designs = configured.to_vec();
    designs.extend(positional.chunks_exact(2).map(|pair| DesignSpec {
        route: PathBuf::from(&pair[0]),
        sdf: PathBuf::from(&pair[1]),
    }));
    if designs.is_empty() {
        return Err(format!(
            "no designs to fit: pass ROUTE SDF pairs or add [[designs]] to {CONFIG_FILE}"
        )
        .into());
    }
    Ok(designs)
}

/// Whether a diagnostic is shown under the current verbosity.
pub fn is_shown(diag: &Diagnostic, global: &GlobalArgs) -> bool {
    !global.quiet && (global.verbose || diag.severity == Severity::Warning)
}

/// Prints diagnostics to stderr, one JSON object per line for `--format json`.
pub fn render_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs, format: ReportFormat) {
    let renderer: Box<dyn DiagnosticRenderer> = match format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(global.color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    for diag in diagnostics.iter().filter(|d| is_shown(d, global)) {
        let text = renderer.render(diag);
        eprintln!("{}", text.trim_end());
    }
}
