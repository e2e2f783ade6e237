#![forbid(unsafe_code)]

mod cmd;
mod manifest;
mod output;

use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "seqdag: order workflow graphs into layers and numbered steps",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Engine configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "seqdag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Order",
        about = "Group nodes into parallel layers",
        long_about = "Peel leaves off the graph repeatedly and print each wave as a layer.",
        after_help = "EXAMPLES:\n    # Print layers for a manifest\n    seqdag layers flow.toml\n\n    # Emit machine-readable output\n    seqdag layers flow.toml --json"
    )]
    Layers(cmd::layers::LayersArgs),

    #[command(
        next_help_heading = "Order",
        about = "Print a flat topological order",
        long_about = "Print every node once, dependencies before dependents, with its layer.",
        after_help = "EXAMPLES:\n    # Flat order, one node per line when piped\n    seqdag topo flow.toml | head\n\n    # Ignore links that would close a loop\n    seqdag topo flow.toml --skip-rejected"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        next_help_heading = "Order",
        about = "Number nodes as hierarchical steps",
        long_about = "Number nodes like a hand-drawn flowchart: 1, 2, 2.1, A.1.",
        after_help = "EXAMPLES:\n    # Number a workflow\n    seqdag steps flow.toml\n\n    # Two-digit padding and no lettered branches\n    seqdag steps flow.toml --step-width 2 --no-letters\n\n    # Emit machine-readable output\n    seqdag steps flow.toml --format json"
    )]
    Steps(cmd::steps::StepsArgs),

    #[command(
        next_help_heading = "Diagnostics",
        about = "Validate a manifest",
        long_about = "Report node and edge counts, leaves, cycles and refused declarations. Exits non-zero on any problem.",
        after_help = "EXAMPLES:\n    # Validate a manifest\n    seqdag check flow.toml\n\n    # Allow cycles so they can be listed\n    seqdag check flow.toml --config permissive.toml"
    )]
    Check(cmd::check::CheckArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SEQDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "seqdag=debug,info"
        } else {
            "seqdag=info,warn"
        })
    });

    let format = env::var("SEQDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = seqdag_core::load_config(&cli.config)?;
    debug!(config = ?config, "loaded engine config");
    let output = cli.output_mode();

    match cli.command {
        Commands::Layers(ref args) => cmd::layers::run_layers(args, config, output),
        Commands::Topo(ref args) => cmd::topo::run_topo(args, config, output),
        Commands::Steps(ref args) => cmd::steps::run_steps(args, config, output),
        Commands::Check(ref args) => cmd::check::run_check(args, config, output),
    }
}
