//! `seqdag layers` — group nodes into levels that can run in parallel.

use std::io::Write;

use clap::Args;
use seqdag_core::{EngineConfig, Graph};
use serde::Serialize;

use super::{GraphArgs, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `seqdag layers`.
#[derive(Args, Debug)]
pub struct LayersArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
}

#[derive(Debug, Serialize)]
struct LayersOutput {
    nodes: usize,
    layers: Vec<Layer>,
}

#[derive(Debug, Serialize)]
struct Layer {
    /// 1-based.
    layer: usize,
    nodes: Vec<String>,
}

fn layers_output(graph: &Graph<String>) -> LayersOutput {
    let layers = graph
        .sorted_layers()
        .into_iter()
        .enumerate()
        .map(|(i, nodes)| Layer {
            layer: i + 1,
            nodes: nodes.into_iter().cloned().collect(),
        })
        .collect();
    LayersOutput {
        nodes: graph.len(),
        layers,
    }
}

/// Execute `seqdag layers`.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded or output rendering fails.
pub fn run_layers(
    args: &LayersArgs,
    config: EngineConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph, config, output)?;
    let payload = layers_output(&graph);
    render_mode(output, &payload, render_layers_text, render_layers_pretty)
}

fn render_layers_text(payload: &LayersOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for layer in &payload.layers {
        writeln!(w, "{}\t{}", layer.layer, layer.nodes.join("\t"))?;
    }
    Ok(())
}

fn render_layers_pretty(payload: &LayersOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Execution layers")?;
    pretty_kv(w, "nodes", payload.nodes.to_string())?;
    pretty_kv(w, "layers", payload.layers.len().to_string())?;

    for layer in &payload.layers {
        let noun = if layer.nodes.len() == 1 { "node" } else { "nodes" };
        writeln!(w, "\nLayer {} ({} {noun}):", layer.layer, layer.nodes.len())?;
        for node in &layer.nodes {
            writeln!(w, "  - {node}")?;
        }
    }
    pretty_rule(w)
}
