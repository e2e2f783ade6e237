//! Layered topological sort.
//!
//! Leaves are peeled off a [`ShrinkingGraph`] one generation at a time. Each
//! generation becomes a layer, so every parent sits in an earlier layer than
//! all of its dependents and the members of one layer can run in parallel.
//!
//! Within a layer, nodes with fewer transitive dependents in the original
//! graph come first; ties keep insertion order.

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use tracing::{debug, instrument, warn};

use crate::graph::snapshot::ShrinkingGraph;
use crate::graph::{Graph, NodeId};

impl<N: NodeId> Graph<N> {
    /// Nodes grouped into dependency layers, first layer first.
    #[must_use]
    #[instrument(skip(self), fields(nodes = self.len()))]
    pub fn sorted_layers(&self) -> Vec<Vec<&N>> {
        self.layer_indices()
            .into_iter()
            .map(|layer| layer.into_iter().map(|ix| self.id_at(ix)).collect())
            .collect()
    }

    /// The layered order flattened into one topological sequence.
    #[must_use]
    pub fn sorted(&self) -> Vec<&N> {
        self.layer_indices()
            .into_iter()
            .flatten()
            .map(|ix| self.id_at(ix))
            .collect()
    }

    /// Node → 1-based layer number.
    #[must_use]
    pub fn layer_map(&self) -> HashMap<&N, usize> {
        self.layer_indices()
            .into_iter()
            .enumerate()
            .flat_map(|(depth, layer)| layer.into_iter().map(move |ix| (ix, depth + 1)))
            .map(|(ix, level)| (self.id_at(ix), level))
            .collect()
    }

    fn layer_indices(&self) -> Vec<Vec<NodeIndex>> {
        let mut snapshot = ShrinkingGraph::of(&self.dag);
        let mut layers = Vec::new();

        loop {
            let mut leaves = snapshot.leaves();
            if leaves.is_empty() {
                break;
            }
            if leaves.len() > 1 {
                leaves.sort_by_cached_key(|&ix| (self.dependents_count(ix), ix));
            }
            for &ix in &leaves {
                snapshot.remove(ix);
            }
            layers.push(leaves);
        }

        if !snapshot.is_empty() {
            warn!(
                unresolved = snapshot.len(),
                "nodes on a cycle were left out of the layered order"
            );
        }
        debug!(layers = layers.len(), "layered sort complete");
        layers
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{CyclePolicy, EngineConfig, GraphConfig};
    use crate::graph::Graph;

    fn build(depends: &[(&'static str, &'static str)]) -> Graph<&'static str> {
        let mut graph = Graph::new();
        for &(child, parent) in depends {
            graph.declare_dependency(child, parent).unwrap();
        }
        graph
    }

    #[test]
    fn linear_chain() {
        let graph = build(&[("b", "a"), ("c", "b")]);
        assert_eq!(graph.sorted_layers(), vec![vec![&"a"], vec![&"b"], vec![&"c"]]);
        assert_eq!(graph.sorted(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn parallel_work_shares_a_layer() {
        let graph = build(&[("c", "a"), ("c", "b"), ("d", "c")]);
        assert_eq!(
            graph.sorted_layers(),
            vec![vec![&"a", &"b"], vec![&"c"], vec![&"d"]]
        );
    }

    #[test]
    fn fewer_dependents_first_within_layer() {
        // "a" feeds two nodes, "b" feeds one.
        let graph = build(&[("x", "a"), ("y", "x"), ("z", "b")]);
        assert_eq!(graph.sorted_layers()[0], vec![&"b", &"a"]);
    }

    #[test]
    fn layer_map_is_one_based() {
        let graph = build(&[("b", "a"), ("c", "b"), ("c", "a")]);
        let map = graph.layer_map();
        assert_eq!(map[&"a"], 1);
        assert_eq!(map[&"b"], 2);
        assert_eq!(map[&"c"], 3);
    }

    #[test]
    fn isolated_nodes_form_first_layer() {
        let mut graph = Graph::new();
        graph.add_node("solo");
        graph.declare_dependency("b", "a").unwrap();
        assert_eq!(graph.sorted_layers(), vec![vec![&"solo", &"a"], vec![&"b"]]);
    }

    #[test]
    fn empty_graph_has_no_layers() {
        let graph: Graph<u32> = Graph::new();
        assert!(graph.sorted_layers().is_empty());
        assert!(graph.layer_map().is_empty());
    }

    #[test]
    fn cyclic_nodes_are_left_out() {
        let mut graph = Graph::with_config(EngineConfig {
            graph: GraphConfig {
                cycle_policy: CyclePolicy::Allow,
            },
            ..EngineConfig::default()
        });
        graph.declare_dependency("b", "a").unwrap();
        graph.declare_dependency("c", "b").unwrap();
        graph.declare_dependency("b", "c").unwrap();

        assert_eq!(graph.sorted_layers(), vec![vec![&"a"]]);
    }
}
