//! Graph manifest files.
//!
//! A manifest lists nodes with their coordinates, labelled links, and plain
//! dependencies. TOML is the default; a `.json` extension switches to JSON.
//!
//! ```toml
//! [[node]]
//! id = "Order Submitted"
//! x = 120.0
//! y = 40.0
//!
//! [[link]]
//! from = "Order Submitted"
//! to = "SIM Type?"
//! label = "eSIM"
//!
//! [[dependency]]
//! child = "Ship"
//! parent = "Pack"
//! ```
//!
//! Declarations are applied in file order: nodes, then links, then
//! dependencies.

use anyhow::{Context, Result};
use seqdag_core::{EngineConfig, Graph, GraphError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub node: Vec<NodeEntry>,
    #[serde(default)]
    pub link: Vec<LinkEntry>,
    #[serde(default)]
    pub dependency: Vec<DependencyEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// `to` depends on `from`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkEntry {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyEntry {
    pub child: String,
    pub parent: String,
}

impl Manifest {
    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let manifest: Self = if is_json {
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse manifest {}", path.display()))?
        } else {
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse manifest {}", path.display()))?
        };

        debug!(
            path = %path.display(),
            nodes = manifest.node.len(),
            links = manifest.link.len(),
            dependencies = manifest.dependency.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Build a graph, failing on the first rejected declaration.
    ///
    /// # Errors
    ///
    /// Returns the [`GraphError`] of the first declaration the graph refuses.
    pub fn build(&self, config: EngineConfig) -> Result<Graph<String>, GraphError> {
        let (graph, rejected) = self.build_lenient(config);
        rejected.into_iter().next().map_or(Ok(graph), Err)
    }

    /// Build a graph, skipping declarations the graph refuses.
    ///
    /// The refused declarations are returned in file order.
    pub fn build_lenient(&self, config: EngineConfig) -> (Graph<String>, Vec<GraphError>) {
        let mut graph = Graph::with_config(config);
        let mut rejected = Vec::new();

        for node in &self.node {
            graph.register(node.id.clone(), node.x, node.y);
        }
        for link in &self.link {
            let label = link.label.clone().unwrap_or_default();
            if let Err(err) = graph.declare_link(label, link.from.clone(), link.to.clone()) {
                rejected.push(err);
            }
        }
        for dep in &self.dependency {
            if let Err(err) = graph.declare_dependency(dep.child.clone(), dep.parent.clone()) {
                rejected.push(err);
            }
        }

        debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            rejected = rejected.len(),
            "built graph from manifest"
        );
        (graph, rejected)
    }
}
