pub mod check;
pub mod layers;
pub mod steps;
pub mod topo;

use std::path::{Path, PathBuf};

use clap::Args;
use seqdag_core::{EngineConfig, Graph};
use tracing::warn;

use crate::manifest::Manifest;
use crate::output::{CliError, OutputMode, render_error};

/// Manifest selection shared by every ordering command.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Graph manifest (TOML, or JSON with a `.json` extension).
    pub file: PathBuf,

    /// Skip declarations the graph refuses instead of failing.
    #[arg(long)]
    pub skip_rejected: bool,
}

/// Load a manifest, rendering a [`CliError`] when it cannot be read.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn load_manifest(path: &Path, output: OutputMode) -> anyhow::Result<Manifest> {
    match Manifest::load(path) {
        Ok(manifest) => Ok(manifest),
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{e:#}"),
                    "check the manifest path and its [[node]]/[[link]]/[[dependency]] tables",
                    "manifest_invalid",
                ),
            )?;
            Err(e)
        }
    }
}

/// Load the manifest named by `args` and build its graph.
///
/// Refused declarations are rendered as [`CliError`]s before the error is
/// returned.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, or if a declaration is
/// refused and `--skip-rejected` is not set.
pub fn load_graph(
    args: &GraphArgs,
    config: EngineConfig,
    output: OutputMode,
) -> anyhow::Result<Graph<String>> {
    let manifest = load_manifest(&args.file, output)?;

    if args.skip_rejected {
        let (graph, rejected) = manifest.build_lenient(config);
        for err in &rejected {
            warn!(code = %err.code(), "skipped declaration: {err}");
        }
        return Ok(graph);
    }

    match manifest.build(config) {
        Ok(graph) => Ok(graph),
        Err(e) => {
            render_error(output, &CliError::from(&e))?;
            anyhow::bail!("{e}");
        }
    }
}
