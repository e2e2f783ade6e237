//! Cycle diagnostics for graphs built under [`CyclePolicy::Allow`].
//!
//! # Overview
//!
//! The rejecting policy keeps the graph acyclic at declaration time, so these
//! searches only find something when cycles were explicitly allowed. Orderings
//! then leave the trapped nodes out; this module says which ones and why.
//!
//! # Design
//!
//! - **Strongly connected components**: every component with more than one
//!   node, or with a self loop, holds at least one cycle. One cycle is
//!   reported per component.
//! - **Depends-on direction**: paths read child → parent → … → child, the
//!   same orientation as [`GraphError::Cycle`](crate::GraphError::Cycle).
//!   Each path is the shortest one through the component's lowest index.
//! - **No recursion**: petgraph's Kosaraju pass and toposort both keep an
//!   explicit stack, so deep graphs cannot exhaust the call stack.
//!
//! [`CyclePolicy::Allow`]: crate::CyclePolicy::Allow

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// One closed index path per cyclic component, ordered by starting index.
pub(crate) fn find_cycles<N, E>(graph: &StableDiGraph<N, E>) -> Vec<Vec<NodeIndex>> {
    let mut cycles: Vec<Vec<NodeIndex>> = kosaraju_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|&ix| has_self_loop(graph, ix))
        })
        .filter_map(|component| cycle_through_lowest(graph, &component))
        .collect();

    cycles.sort_unstable_by_key(|path| path.first().copied());
    cycles
}

/// `true` when no topological order exists.
pub(crate) fn has_cycles<N, E>(graph: &StableDiGraph<N, E>) -> bool {
    toposort(graph, None).is_err()
}

// ---------------------------------------------------------------------------
// Path reconstruction
// ---------------------------------------------------------------------------

fn has_self_loop<N, E>(graph: &StableDiGraph<N, E>, ix: NodeIndex) -> bool {
    graph.find_edge(ix, ix).is_some()
}

/// Breadth-first search from the component's lowest index along its
/// dependencies, stopping at the first edge back to the start.
fn cycle_through_lowest<N, E>(
    graph: &StableDiGraph<N, E>,
    component: &[NodeIndex],
) -> Option<Vec<NodeIndex>> {
    let start = component.iter().min().copied()?;
    if component.len() == 1 {
        return Some(vec![start, start]);
    }

    let members: HashSet<NodeIndex> = component.iter().copied().collect();
    let mut reached_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let mut parents: Vec<NodeIndex> = graph
            .neighbors_directed(current, Direction::Incoming)
            .filter(|ix| *ix != current && members.contains(ix))
            .collect();
        parents.sort_unstable();

        for parent in parents {
            if parent == start {
                let mut path = vec![start];
                let mut cursor = current;
                while cursor != start {
                    path.push(cursor);
                    cursor = *reached_from.get(&cursor)?;
                }
                path.reverse();
                path.insert(0, start);
                return Some(path);
            }
            if !reached_from.contains_key(&parent) {
                reached_from.insert(parent, current);
                queue.push_back(parent);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
