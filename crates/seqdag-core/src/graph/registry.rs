//! Node registry and mirrored edge index.
//!
//! # Overview
//!
//! A [`Graph`] owns every declared node together with its coordinate hint and
//! insertion sequence, plus the depends-on relation between nodes. Edges are
//! stored once, parent → child, in a petgraph `StableDiGraph`; the dependency
//! view (child → parents) and the dependent view (parent → children) are the
//! incoming and outgoing neighbour lists of the same edge, so they cannot
//! drift apart.
//!
//! # Design
//!
//! - **Insertion order is the node index.** The source graph never removes
//!   nodes, so `NodeIndex` order equals registration order and every
//!   "ascending insertion order" tie-break is an index comparison.
//! - **Checks before mutation.** Declarations validate self references, label
//!   conflicts and cycles first; a failed declaration leaves the graph as it
//!   was.
//! - **Link labels are edge weights.** `None` means an unlabelled edge.
//!
//! # Usage
//!
//! ```rust
//! use seqdag_core::Graph;
//!
//! let mut graph = Graph::new();
//! graph.declare_dependency("cake", "eggs")?;
//! graph.declare_link("Yes", "eggs", "omelette")?;
//!
//! assert!(graph.depends_on("cake", "eggs"));
//! assert_eq!(graph.link_label("eggs", "omelette"), Some("Yes"));
//! assert_eq!(graph.leaves(), vec![&"eggs"]);
//! # Ok::<(), seqdag_core::GraphError>(())
//! ```

#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::collapsible_if
)]

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use serde::Serialize;
use tracing::{debug, trace};

use super::closure::{path_between, reach};
use super::cycles;
use crate::config::{CyclePolicy, EngineConfig};
use crate::error::{GraphError, render_id};

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Identifier bound for graph nodes.
pub trait NodeId: Clone + Eq + Hash + Debug {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Debug {}

/// A registered node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<N> {
    pub id: N,
    /// Horizontal coordinate hint, `0.0` unless registered.
    pub x: f64,
    /// Vertical coordinate hint, `0.0` unless registered.
    pub y: f64,
    /// Zero-based registration sequence.
    pub insertion_order: usize,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A depends-on graph over caller-supplied node ids.
#[derive(Debug, Clone)]
pub struct Graph<N: NodeId> {
    pub(crate) dag: StableDiGraph<Node<N>, Option<String>>,
    index: HashMap<N, NodeIndex>,
    pub(crate) config: EngineConfig,
}

impl<N: NodeId> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> Graph<N> {
    /// An empty graph with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            dag: StableDiGraph::new(),
            index: HashMap::new(),
            config,
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- Registration -------------------------------------------------------

    /// Insert `id` with the given coordinates, or overwrite the coordinates of
    /// an existing node. Re-registering keeps the original insertion sequence.
    pub fn register(&mut self, id: N, x: f64, y: f64) {
        let ix = self.ensure(id);
        let node = &mut self.dag[ix];
        node.x = x;
        node.y = y;
    }

    /// Insert `id` at `(0, 0)` unless it is already registered.
    pub fn add_node(&mut self, id: N) {
        self.ensure(id);
    }

    fn ensure(&mut self, id: N) -> NodeIndex {
        if let Some(&ix) = self.index.get(&id) {
            return ix;
        }
        let insertion_order = self.index.len();
        trace!(node = ?id, insertion_order, "registering node");
        let ix = self.dag.add_node(Node {
            id: id.clone(),
            x: 0.0,
            y: 0.0,
            insertion_order,
        });
        self.index.insert(id, ix);
        ix
    }

    // -- Declarations -------------------------------------------------------

    /// Declare that `child` depends on `parent`.
    ///
    /// Missing endpoints are registered, parent first. Declaring an existing
    /// edge again succeeds without changing anything.
    ///
    /// # Errors
    ///
    /// - [`GraphError::SelfReference`] when `child == parent`.
    /// - [`GraphError::Cycle`] when `parent` already depends on `child` and
    ///   the cycle policy is [`CyclePolicy::Reject`].
    pub fn declare_dependency(&mut self, child: N, parent: N) -> Result<(), GraphError> {
        if child == parent {
            return Err(GraphError::self_reference(&child));
        }
        self.check_cycle(&child, &parent)?;

        let parent_ix = self.ensure(parent);
        let child_ix = self.ensure(child);
        self.edge(parent_ix, child_ix);
        Ok(())
    }

    /// Declare a labelled link `from → to`, meaning `to` depends on `from`.
    ///
    /// An empty label declares the dependency without recording a label.
    ///
    /// # Errors
    ///
    /// As [`Graph::declare_dependency`], plus [`GraphError::LinkConflict`]
    /// when the pair already carries a different label.
    pub fn declare_link(
        &mut self,
        label: impl Into<String>,
        from: N,
        to: N,
    ) -> Result<(), GraphError> {
        let label = label.into();
        if from == to {
            return Err(GraphError::self_reference(&from));
        }
        if !label.is_empty() {
            if let Some(existing) = self.link_label(&from, &to) {
                if existing != label {
                    return Err(GraphError::LinkConflict {
                        from: render_id(&from),
                        to: render_id(&to),
                        existing: existing.to_string(),
                        requested: label,
                    });
                }
            }
        }
        self.check_cycle(&to, &from)?;

        let from_ix = self.ensure(from);
        let to_ix = self.ensure(to);
        let edge = self.edge(from_ix, to_ix);
        if !label.is_empty() {
            self.dag[edge] = Some(label);
        }
        Ok(())
    }

    fn edge(&mut self, parent: NodeIndex, child: NodeIndex) -> EdgeIndex {
        if let Some(edge) = self.dag.find_edge(parent, child) {
            return edge;
        }
        debug!(
            child = ?self.dag[child].id,
            parent = ?self.dag[parent].id,
            "declared dependency"
        );
        self.dag.add_edge(parent, child, None)
    }

    fn check_cycle(&self, child: &N, parent: &N) -> Result<(), GraphError> {
        if self.config.graph.cycle_policy == CyclePolicy::Allow {
            return Ok(());
        }
        let (Some(&child_ix), Some(&parent_ix)) = (self.index.get(child), self.index.get(parent))
        else {
            return Ok(());
        };

        match path_between(&self.dag, parent_ix, child_ix, Direction::Incoming) {
            Some(chain) => {
                let path = std::iter::once(child_ix)
                    .chain(chain)
                    .map(|ix| render_id(&self.dag[ix].id))
                    .collect();
                Err(GraphError::Cycle {
                    child: render_id(child),
                    parent: render_id(parent),
                    path,
                })
            }
            None => Ok(()),
        }
    }

    // -- Queries ------------------------------------------------------------

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<N>> + '_ {
        self.dag.node_indices().map(move |ix| &self.dag[ix])
    }

    pub fn node<Q>(&self, id: &Q) -> Option<&Node<N>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).map(|&ix| &self.dag[ix])
    }

    /// Nodes without any dependency, in insertion order.
    pub fn leaves(&self) -> Vec<&N> {
        self.dag
            .node_indices()
            .filter(|&ix| {
                self.dag
                    .neighbors_directed(ix, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|ix| &self.dag[ix].id)
            .collect()
    }

    /// `true` when `child` depends on `parent`, directly or transitively.
    pub fn depends_on<Q>(&self, child: &Q, parent: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.reaches(child, parent, Direction::Incoming)
    }

    /// `true` when `child` is among the transitive dependents of `parent`.
    pub fn has_dependent<Q>(&self, parent: &Q, child: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.reaches(parent, child, Direction::Outgoing)
    }

    /// Transitive dependencies of `id` in insertion order. Empty when `id` is
    /// not registered.
    pub fn dependencies<Q>(&self, id: &Q) -> Vec<&N>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.closure(id, Direction::Incoming)
    }

    /// Transitive dependents of `id` in insertion order.
    pub fn dependents<Q>(&self, id: &Q) -> Vec<&N>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.closure(id, Direction::Outgoing)
    }

    /// Label recorded on the link `from → to`, if any.
    pub fn link_label<Q>(&self, from: &Q, to: &Q) -> Option<&str>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        self.label_between(from, to)
    }

    pub fn len(&self) -> usize {
        self.dag.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.dag.edge_count()
    }

    // -- Cycle diagnostics --------------------------------------------------

    /// `true` when the graph contains a cycle. Only possible under
    /// [`CyclePolicy::Allow`].
    pub fn has_cycles(&self) -> bool {
        cycles::has_cycles(&self.dag)
    }

    /// Each cycle as a closed depends-on path: every id depends on the next,
    /// and the last repeats the first.
    pub fn find_cycles(&self) -> Vec<Vec<&N>> {
        cycles::find_cycles(&self.dag)
            .into_iter()
            .map(|path| path.into_iter().map(|ix| &self.dag[ix].id).collect())
            .collect()
    }

    // -- Crate internals ----------------------------------------------------

    pub(crate) fn id_at(&self, ix: NodeIndex) -> &N {
        &self.dag[ix].id
    }

    pub(crate) fn node_at(&self, ix: NodeIndex) -> &Node<N> {
        &self.dag[ix]
    }

    /// Size of the transitive dependent set in this (unshrunk) graph.
    pub(crate) fn dependents_count(&self, ix: NodeIndex) -> usize {
        reach(&self.dag, ix, Direction::Outgoing).len()
    }

    pub(crate) fn label_between(&self, from: NodeIndex, to: NodeIndex) -> Option<&str> {
        let edge = self.dag.find_edge(from, to)?;
        self.dag.edge_weight(edge)?.as_deref()
    }

    fn reaches<Q>(&self, from: &Q, to: &Q, direction: Direction) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(&from), Some(&to)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        reach(&self.dag, from, direction).contains(&to)
    }

    fn closure<Q>(&self, id: &Q, direction: Direction) -> Vec<&N>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).map_or_else(Vec::new, |&ix| {
            reach(&self.dag, ix, direction)
                .into_iter()
                .map(|ix| self.id_at(ix))
                .collect()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
