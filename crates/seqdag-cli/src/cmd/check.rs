//! `seqdag check` — validate a manifest and report graph health.
//!
//! Every declaration is attempted; refused ones are listed instead of
//! aborting the run. Exits non-zero when anything was refused or a cycle
//! was found.

use std::io::Write;

use clap::Args;
use seqdag_core::{EngineConfig, Graph, GraphError};
use serde::Serialize;

use super::load_manifest;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `seqdag check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Graph manifest (TOML, or JSON with a `.json` extension).
    pub file: std::path::PathBuf,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    ok: bool,
    nodes: usize,
    edges: usize,
    leaves: Vec<String>,
    cycles: Vec<Vec<String>>,
    rejected: Vec<CliError>,
}

fn check_output(graph: &Graph<String>, rejected: &[GraphError]) -> CheckOutput {
    let cycles: Vec<Vec<String>> = graph
        .find_cycles()
        .into_iter()
        .map(|cycle| cycle.into_iter().cloned().collect())
        .collect();
    CheckOutput {
        ok: cycles.is_empty() && rejected.is_empty(),
        nodes: graph.len(),
        edges: graph.edge_count(),
        leaves: graph.leaves().into_iter().cloned().collect(),
        cycles,
        rejected: rejected.iter().map(CliError::from).collect(),
    }
}

/// Execute `seqdag check`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, if any declaration is
/// refused, or if the graph contains a cycle.
pub fn run_check(args: &CheckArgs, config: EngineConfig, output: OutputMode) -> anyhow::Result<()> {
    let manifest = load_manifest(&args.file, output)?;
    let (graph, rejected) = manifest.build_lenient(config);
    let payload = check_output(&graph, &rejected);
    render_mode(output, &payload, render_check_text, render_check_pretty)?;

    if !payload.ok {
        anyhow::bail!(
            "{} refused declaration(s), {} cycle(s)",
            payload.rejected.len(),
            payload.cycles.len()
        );
    }
    Ok(())
}

fn render_check_text(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "nodes\t{}", payload.nodes)?;
    writeln!(w, "edges\t{}", payload.edges)?;
    writeln!(w, "leaves\t{}", payload.leaves.join("\t"))?;
    for cycle in &payload.cycles {
        writeln!(w, "cycle\t{}", cycle.join("\t"))?;
    }
    for err in &payload.rejected {
        writeln!(
            w,
            "rejected\t{}\t{}",
            err.error_code.as_deref().unwrap_or(""),
            err.message
        )?;
    }
    Ok(())
}

fn render_check_pretty(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Graph check")?;
    pretty_kv(w, "status", if payload.ok { "ok" } else { "problems found" })?;
    pretty_kv(w, "nodes", payload.nodes.to_string())?;
    pretty_kv(w, "edges", payload.edges.to_string())?;
    pretty_kv(w, "leaves", payload.leaves.join(", "))?;

    if !payload.cycles.is_empty() {
        writeln!(w, "\nCycles ({}):", payload.cycles.len())?;
        for cycle in &payload.cycles {
            writeln!(w, "  - {}", cycle.join(" → "))?;
        }
    }

    if !payload.rejected.is_empty() {
        writeln!(w, "\nRefused declarations ({}):", payload.rejected.len())?;
        for err in &payload.rejected {
            match err.error_code {
                Some(ref code) => writeln!(w, "  - [{code}] {}", err.message)?,
                None => writeln!(w, "  - {}", err.message)?,
            }
            if let Some(ref suggestion) = err.suggestion {
                writeln!(w, "    suggestion: {suggestion}")?;
            }
        }
    }
    pretty_rule(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqdag_core::{CyclePolicy, GraphConfig};

    #[test]
    fn clean_graph_is_ok() {
        let mut graph = Graph::new();
        graph
            .declare_dependency("b".to_string(), "a".to_string())
            .unwrap();

        let payload = check_output(&graph, &[]);
        assert!(payload.ok);
        assert_eq!(payload.nodes, 2);
        assert_eq!(payload.edges, 1);
        assert_eq!(payload.leaves, vec!["a"]);
        assert!(payload.cycles.is_empty());
    }

    #[test]
    fn refused_declarations_are_reported() {
        let mut graph = Graph::new();
        graph
            .declare_dependency("b".to_string(), "a".to_string())
            .unwrap();
        let err = graph
            .declare_dependency("a".to_string(), "b".to_string())
            .unwrap_err();

        let payload = check_output(&graph, &[err]);
        assert!(!payload.ok);
        assert_eq!(payload.rejected.len(), 1);
        assert_eq!(payload.rejected[0].error_code.as_deref(), Some("E1002"));

        let mut out = Vec::new();
        render_check_text(&payload, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("rejected\tE1002\t"));
    }

    #[test]
    fn permissive_cycles_are_reported() {
        let mut graph = Graph::with_config(EngineConfig {
            graph: GraphConfig {
                cycle_policy: CyclePolicy::Allow,
            },
            ..EngineConfig::default()
        });
        graph
            .declare_dependency("b".to_string(), "a".to_string())
            .unwrap();
        graph
            .declare_dependency("a".to_string(), "b".to_string())
            .unwrap();

        let payload = check_output(&graph, &[]);
        assert!(!payload.ok);
        assert_eq!(payload.cycles.len(), 1);
        assert!(payload.leaves.is_empty());

        let mut out = Vec::new();
        render_check_pretty(&payload, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Cycles (1):"));
    }
}
