//! `seqdag topo` — flattened topological order.

use std::io::Write;

use clap::Args;
use seqdag_core::{EngineConfig, Graph};
use serde::Serialize;

use super::{GraphArgs, load_graph};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `seqdag topo`.
#[derive(Args, Debug)]
pub struct TopoArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
}

#[derive(Debug, Serialize)]
struct TopoOutput {
    order: Vec<TopoEntry>,
}

#[derive(Debug, Serialize)]
struct TopoEntry {
    node: String,
    layer: usize,
}

fn topo_output(graph: &Graph<String>) -> TopoOutput {
    let layers = graph.layer_map();
    let order = graph
        .sorted()
        .into_iter()
        .map(|node| TopoEntry {
            node: node.clone(),
            layer: layers.get(node).copied().unwrap_or_default(),
        })
        .collect();
    TopoOutput { order }
}

/// Execute `seqdag topo`.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded or output rendering fails.
pub fn run_topo(args: &TopoArgs, config: EngineConfig, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph, config, output)?;
    let payload = topo_output(&graph);
    render_mode(
        output,
        &payload,
        |payload, w| {
            for entry in &payload.order {
                writeln!(w, "{}", entry.node)?;
            }
            Ok(())
        },
        render_topo_pretty,
    )
}

fn render_topo_pretty(payload: &TopoOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Topological order")?;
    if payload.order.is_empty() {
        writeln!(w, "(empty graph)")?;
        return Ok(());
    }
    let width = payload.order.len().to_string().len();
    for (i, entry) in payload.order.iter().enumerate() {
        writeln!(
            w,
            "{:>width$}. {}  (layer {})",
            i + 1,
            entry.node,
            entry.layer
        )?;
    }
    Ok(())
}
