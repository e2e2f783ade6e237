//! `seqdag steps` — hierarchical step numbering (`1`, `2.1`, `A.1`).
//!
//! Flags override the `[order]` table of the config file for one run.

use std::io::Write;

use clap::Args;
use seqdag_core::{EngineConfig, Graph, OrderConfig};
use serde::Serialize;

use super::{GraphArgs, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `seqdag steps`.
#[derive(Args, Debug)]
pub struct StepsArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Zero-padding width of numeric components in the sortable step.
    #[arg(long)]
    pub step_width: Option<usize>,

    /// Number alternate starting paths instead of lettering them `A.`, `B.`.
    #[arg(long)]
    pub no_letters: bool,

    /// Rank starting nodes by dependent count instead of by coordinates.
    #[arg(long)]
    pub by_dependents: bool,
}

impl StepsArgs {
    fn order_config(&self, base: &OrderConfig) -> OrderConfig {
        OrderConfig {
            step_width: self.step_width.unwrap_or(base.step_width),
            letter_branches: base.letter_branches && !self.no_letters,
            start_top_left: base.start_top_left && !self.by_dependents,
        }
    }
}

#[derive(Debug, Serialize)]
struct StepsOutput {
    steps: Vec<StepRow>,
    /// Nodes the numbering could not reach (cycles under a permissive policy).
    unnumbered: usize,
}

#[derive(Debug, Serialize)]
struct StepRow {
    step: String,
    sorted_step: String,
    level: usize,
    node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_link_label: Option<String>,
}

fn steps_output(graph: &Graph<String>, options: &OrderConfig) -> StepsOutput {
    let steps: Vec<StepRow> = graph
        .sorted_with_order_using(options)
        .into_iter()
        .map(|record| StepRow {
            step: record.step,
            sorted_step: record.sorted_step,
            level: record.level,
            node: record.node,
            from_link_label: record.from_link_label,
        })
        .collect();
    StepsOutput {
        unnumbered: graph.len().saturating_sub(steps.len()),
        steps,
    }
}

/// Execute `seqdag steps`.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded or output rendering fails.
pub fn run_steps(args: &StepsArgs, config: EngineConfig, output: OutputMode) -> anyhow::Result<()> {
    let options = args.order_config(&config.order);
    let graph = load_graph(&args.graph, config, output)?;
    let payload = steps_output(&graph, &options);
    render_mode(output, &payload, render_steps_text, render_steps_pretty)
}

fn render_steps_text(payload: &StepsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &payload.steps {
        writeln!(
            w,
            "{}\t{}\t{}",
            row.step,
            row.node,
            row.from_link_label.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

fn render_steps_pretty(payload: &StepsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Steps")?;
    for row in &payload.steps {
        let indent = "  ".repeat(row.level);
        match row.from_link_label {
            Some(ref label) => writeln!(w, "{indent}{:<10} {}  [{label}]", row.step, row.node)?,
            None => writeln!(w, "{indent}{:<10} {}", row.step, row.node)?,
        }
    }
    if payload.unnumbered > 0 {
        writeln!(w)?;
        pretty_kv(
            w,
            "unnumbered",
            format!("{} (run `seqdag check` to list cycles)", payload.unnumbered),
        )?;
    }
    Ok(())
}
