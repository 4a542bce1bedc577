//! pipfit CLI: fits per-class switch delay coefficients from routed designs
//! and their interconnect timing annotations.
//!
//! `pipfit solve` reads every design named in `pipfit.toml` and on the command
//! line, assembles one least-squares system over all of them and prints the
//! fitted delay of each switch class.

#![warn(missing_docs)]

mod pipeline;
mod solve;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// pipfit: interconnect delay extraction for FPGA routing fabrics.
#[derive(Parser, Debug)]
#[command(name = "pipfit", version, about = "Interconnect delay coefficient extraction")]
pub struct Cli {
    /// Suppress all output except errors and the report.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print informational notes.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `pipfit.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fit delay coefficients over one or more routed designs.
    Solve(SolveArgs),
}

/// Arguments for the `pipfit solve` subcommand.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// Output format for the fitted coefficients.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Annotation cell holding the interconnect delays (overrides `fit.top_scope`).
    #[arg(long)]
    pub top: Option<String>,

    /// Extra switch class to treat as zero-delay. May be repeated.
    #[arg(long = "zero-delay", value_name = "CLASS")]
    pub zero_delay: Vec<String>,

    /// Route dump and SDF file pairs: `ROUTE SDF [ROUTE SDF]...`.
    #[arg(value_name = "ROUTE SDF")]
    pub designs: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report and diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Fixed-width text table.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress status lines and diagnostics.
    pub quiet: bool,
    /// Whether to print notes as well as warnings.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Solve(ref args) => solve::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
