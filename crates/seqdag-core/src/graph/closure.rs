//! Transitive closure over one adjacency direction.
//!
//! Edges run parent → child, so [`Direction::Outgoing`] walks dependents and
//! [`Direction::Incoming`] walks dependencies. Both searches are breadth-first
//! and visit every node and edge at most once.

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

/// Every node reachable from `root` in `direction`, excluding `root` itself.
///
/// Returns an empty set when `root` is not in the graph.
pub(crate) fn reach<N, E>(
    graph: &StableDiGraph<N, E>,
    root: NodeIndex,
    direction: Direction,
) -> BTreeSet<NodeIndex> {
    let mut seen = BTreeSet::new();
    if !graph.contains_node(root) {
        return seen;
    }

    let mut frontier = vec![root];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for ix in frontier {
            for neighbor in graph.neighbors_directed(ix, direction) {
                if neighbor != root && seen.insert(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        frontier = next;
    }

    seen
}

/// Shortest path `from → … → to` in `direction`, both ends included.
pub(crate) fn path_between<N, E>(
    graph: &StableDiGraph<N, E>,
    from: NodeIndex,
    to: NodeIndex,
    direction: Direction,
) -> Option<Vec<NodeIndex>> {
    if !graph.contains_node(from) || !graph.contains_node(to) {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([from]);

    while let Some(ix) = queue.pop_front() {
        for neighbor in graph.neighbors_directed(ix, direction) {
            if neighbor == from || came_from.contains_key(&neighbor) {
                continue;
            }
            came_from.insert(neighbor, ix);
            if neighbor == to {
                let mut path = vec![to];
                let mut cur = to;
                while let Some(&prev) = came_from.get(&cur) {
                    path.push(prev);
                    cur = prev;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(neighbor);
        }
    }

    None
}
