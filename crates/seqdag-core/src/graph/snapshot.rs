//! Disposable copy of the edge index that orderings peel apart.
//!
//! A [`ShrinkingGraph`] shares node indices with the [`Graph`](super::Graph)
//! it was taken from, so labels and coordinates are still looked up in the
//! source graph. Removing a node strips both adjacency directions at once.

use std::collections::BTreeSet;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use super::closure::reach;

#[derive(Debug, Clone)]
pub(crate) struct ShrinkingGraph {
    live: StableDiGraph<(), ()>,
}

impl ShrinkingGraph {
    /// Structural copy of `graph`. Indices are preserved.
    pub(crate) fn of<N, E>(graph: &StableDiGraph<N, E>) -> Self {
        Self {
            live: graph.map(|_, _| (), |_, _| ()),
        }
    }

    /// Nodes with no remaining dependency, in index (insertion) order.
    pub(crate) fn leaves(&self) -> Vec<NodeIndex> {
        self.live
            .node_indices()
            .filter(|&ix| {
                self.live
                    .neighbors_directed(ix, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect()
    }

    /// Size of the transitive dependent set among the nodes still present.
    pub(crate) fn dependents_count(&self, ix: NodeIndex) -> usize {
        reach(&self.live, ix, Direction::Outgoing).len()
    }

    /// Remove `ix`, returning the direct dependents it had.
    pub(crate) fn remove(&mut self, ix: NodeIndex) -> Vec<NodeIndex> {
        let dependents: BTreeSet<NodeIndex> = self
            .live
            .neighbors_directed(ix, Direction::Outgoing)
            .collect();
        self.live.remove_node(ix);
        dependents.into_iter().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.live.node_count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
