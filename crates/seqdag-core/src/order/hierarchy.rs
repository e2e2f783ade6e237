//! Hierarchical step numbering.
//!
//! # Overview
//!
//! Produces one [`TopologyOrder`] per node with a step label in the style of a
//! hand-numbered flowchart: the main path counts `1`, `2`, `3`, a branch off
//! step 8 counts `8.1`, `8.2`, and alternate starting points are lettered
//! `A.1`, `B.1`.
//!
//! # Design
//!
//! The assigner walks a [`ShrinkingGraph`], removing each node as it is
//! numbered and following that node's dependents while they last:
//!
//! - The first leaf of a call continues the current prefix.
//! - Every further leaf opens a branch. At the very first call the branch is
//!   lettered; elsewhere it hangs off the number of the node that opened the
//!   call (`8.`), with an extra index when three or more leaves compete
//!   (`8.1.`, `8.2.`) so sibling branches never share a prefix.
//! - A node reachable along several paths is numbered once, by the first path
//!   to get there.
//! - When a followed path runs out, numbering resumes from the remaining
//!   leaves only at the top level.
//!
//! Leaves are tried in order of most transitive dependents first, so the
//! longest continuation keeps the main numbers. The first call instead orders
//! by coordinate when [`OrderConfig::start_top_left`] is set. Remaining ties
//! keep insertion order. Records are finally sorted by their zero-padded
//! `sorted_step`.
//!
//! Calls are kept on an explicit stack of frames rather than the native
//! call stack, so a long chain cannot exhaust it. A frame is entered at the
//! moment its parent numbers the node that opens it, which keeps the visit
//! order a plain pre-order.
//!
//! No numeric component can exceed the node count, so the padding width is
//! raised to the node count's digit count when the configured width is too
//! narrow for it.

use std::cmp::Reverse;
use std::collections::HashSet;

use petgraph::stable_graph::NodeIndex;
use tracing::{debug, instrument, trace, warn};

use super::TopologyOrder;
use super::steps::{StepPrefix, padding_width};
use crate::config::OrderConfig;
use crate::graph::snapshot::ShrinkingGraph;
use crate::graph::{Graph, NodeId};

impl<N: NodeId> Graph<N> {
    /// Hierarchical step order using the graph's configured [`OrderConfig`].
    #[must_use]
    pub fn sorted_with_order(&self) -> Vec<TopologyOrder<N>> {
        self.sorted_with_order_using(&self.config.order)
    }

    /// Hierarchical step order with explicit options.
    #[must_use]
    #[instrument(skip(self, options), fields(nodes = self.len()))]
    pub fn sorted_with_order_using(&self, options: &OrderConfig) -> Vec<TopologyOrder<N>> {
        let width = padding_width(options.step_width, self.len());
        if width > options.step_width {
            debug!(
                configured = options.step_width,
                width, "widened step padding to fit the node count"
            );
        }

        let mut assigner = Assigner {
            graph: self,
            options,
            snapshot: ShrinkingGraph::of(&self.dag),
            handled: HashSet::with_capacity(self.len()),
            records: Vec::with_capacity(self.len()),
            first_call_pending: true,
        };
        assigner.run(StepPrefix::root(width));

        let mut records = assigner.records;
        records.sort_by(|a, b| a.sorted_step.cmp(&b.sorted_step));

        if records.len() < self.len() {
            warn!(
                numbered = records.len(),
                nodes = self.len(),
                "nodes on a cycle were left out of the step order"
            );
        }
        debug!(records = records.len(), "step order complete");
        records
    }
}

struct Assigner<'g, N: NodeId> {
    graph: &'g Graph<N>,
    options: &'g OrderConfig,
    snapshot: ShrinkingGraph,
    handled: HashSet<NodeIndex>,
    records: Vec<TopologyOrder<N>>,
    first_call_pending: bool,
}

/// One pending numbering call: ranked leaves still to number under `prefix`.
struct Frame {
    prefix: StepPrefix,
    offset: usize,
    level: usize,
    previous: Option<NodeIndex>,
    top_level: bool,
    first_call: bool,
    leaves: Vec<NodeIndex>,
    next: usize,
}

impl<N: NodeId> Assigner<'_, N> {
    fn run(&mut self, root: StepPrefix) {
        let mut stack: Vec<Frame> = self.enter(root, 1, 0, None, None).into_iter().collect();

        while let Some(frame) = stack.last_mut() {
            let Some(&leaf) = frame.leaves.get(frame.next) else {
                stack.pop();
                continue;
            };
            let i = frame.next;
            frame.next += 1;
            if self.handled.contains(&leaf) {
                continue;
            }

            let count = frame.leaves.len();
            let (branch, branch_offset, branch_level) = if i == 0 {
                (frame.prefix.clone(), frame.offset, frame.level)
            } else if frame.first_call && self.options.letter_branches {
                (frame.prefix.letter(i - 1), 1, frame.level + 1)
            } else if count == 2 {
                (frame.prefix.number(frame.offset - 1), 1, frame.level + 1)
            } else {
                (
                    frame.prefix.number(frame.offset - 1).number(i),
                    1,
                    frame.level + 1,
                )
            };
            let previous = frame.previous;
            let top_level = frame.top_level;

            self.number(leaf, &branch, branch_offset, branch_level, previous);

            let dependents = self.snapshot.remove(leaf);
            if dependents.is_empty() && !top_level {
                continue;
            }
            let candidates = if dependents.is_empty() {
                None
            } else {
                Some(dependents)
            };
            if let Some(child) = self.enter(
                branch,
                branch_offset + 1,
                branch_level,
                Some(leaf),
                candidates,
            ) {
                stack.push(child);
            }
        }
    }

    /// Open a call over `candidates` (or the current leaves when `None`)
    /// starting at `prefix` + `offset`. `None` when there is nothing to number.
    fn enter(
        &mut self,
        prefix: StepPrefix,
        offset: usize,
        level: usize,
        previous: Option<NodeIndex>,
        candidates: Option<Vec<NodeIndex>>,
    ) -> Option<Frame> {
        let top_level = candidates.is_none();
        let first_call = top_level && std::mem::take(&mut self.first_call_pending);

        let mut leaves: Vec<NodeIndex> = match candidates {
            None => self.snapshot.leaves(),
            Some(children) => children
                .into_iter()
                .filter(|ix| !self.handled.contains(ix))
                .collect(),
        };
        if leaves.is_empty() {
            return None;
        }
        if leaves.len() > 1 {
            self.rank(&mut leaves, first_call);
        }

        Some(Frame {
            prefix,
            offset,
            level,
            previous,
            top_level,
            first_call,
            leaves,
            next: 0,
        })
    }

    fn number(
        &mut self,
        leaf: NodeIndex,
        branch: &StepPrefix,
        offset: usize,
        level: usize,
        previous: Option<NodeIndex>,
    ) {
        let (step, sorted_step) = branch.label(offset);
        let from_link_label = previous
            .and_then(|prev| self.graph.label_between(prev, leaf))
            .map(str::to_string);
        trace!(node = ?self.graph.id_at(leaf), %step, level, "assigned step");

        self.handled.insert(leaf);
        self.records.push(TopologyOrder {
            node: self.graph.id_at(leaf).clone(),
            step,
            sorted_step,
            level,
            from_link_label,
        });
    }

    fn rank(&self, leaves: &mut [NodeIndex], first_call: bool) {
        if first_call && self.options.start_top_left {
            leaves.sort_by(|&a, &b| {
                let (na, nb) = (self.graph.node_at(a), self.graph.node_at(b));
                na.x.total_cmp(&nb.x)
                    .then(na.y.total_cmp(&nb.y))
                    .then(a.cmp(&b))
            });
        } else {
            leaves.sort_by_cached_key(|&ix| (Reverse(self.snapshot.dependents_count(ix)), ix));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::OrderConfig;
    use crate::graph::Graph;

    /// `(step, node)` pairs in output order.
    fn steps(graph: &Graph<&'static str>) -> Vec<(String, &'static str)> {
        graph
            .sorted_with_order()
            .into_iter()
            .map(|record| (record.step, record.node))
            .collect()
    }

    fn expect(pairs: &[(&str, &'static str)]) -> Vec<(String, &'static str)> {
        pairs.iter().map(|&(s, n)| (s.to_string(), n)).collect()
    }

    fn links(edges: &[(&'static str, &'static str)]) -> Graph<&'static str> {
        let mut graph = Graph::new();
        for &(from, to) in edges {
            graph.declare_link("", from, to).unwrap();
        }
        graph
    }

    // -----------------------------------------------------------------------
    // Main path
    // -----------------------------------------------------------------------

    #[test]
    fn chain_counts_up() {
        let graph = links(&[("a", "b"), ("b", "c")]);
        assert_eq!(steps(&graph), expect(&[("1", "a"), ("2", "b"), ("3", "c")]));
    }

    #[test]
    fn sorted_step_is_padded() {
        let graph = links(&[("a", "b")]);
        let records = graph.sorted_with_order();
        assert_eq!(records[0].sorted_step, "0001");
        assert_eq!(records[1].sorted_step, "0002");
        assert_eq!(records[1].level, 0);
    }

    #[test]
    fn empty_graph_yields_nothing() {
        let graph: Graph<&str> = Graph::new();
        assert!(graph.sorted_with_order().is_empty());
    }

    #[test]
    fn isolated_node_is_emitted() {
        let mut graph = Graph::new();
        graph.add_node("solo");
        assert_eq!(steps(&graph), expect(&[("1", "solo")]));
    }

    // -----------------------------------------------------------------------
    // Branching
    // -----------------------------------------------------------------------

    #[test]
    fn two_way_branch_hangs_off_opener() {
        // a → b → {long → tail, short}
        let graph = links(&[("a", "b"), ("b", "long"), ("long", "tail"), ("b", "short")]);
        assert_eq!(
            steps(&graph),
            expect(&[
                ("1", "a"),
                ("2", "b"),
                ("2.1", "short"),
                ("3", "long"),
                ("4", "tail"),
            ])
        );
    }

    #[test]
    fn three_way_branch_gets_indexed_prefixes() {
        let graph = links(&[
            ("a", "main"),
            ("main", "main2"),
            ("main2", "main3"),
            ("a", "mid"),
            ("mid", "mid2"),
            ("a", "short"),
        ]);
        assert_eq!(
            steps(&graph),
            expect(&[
                ("1", "a"),
                ("1.1.1", "mid"),
                ("1.1.2", "mid2"),
                ("1.2.1", "short"),
                ("2", "main"),
                ("3", "main2"),
                ("4", "main3"),
            ])
        );
    }

    #[test]
    fn branch_levels_deepen() {
        let graph = links(&[("a", "b"), ("a", "c"), ("c", "d")]);
        let records = graph.sorted_with_order();
        let b = records.iter().find(|r| r.node == "b").unwrap();
        let d = records.iter().find(|r| r.node == "d").unwrap();
        assert_eq!(b.step, "1.1");
        assert_eq!(b.level, 1);
        assert_eq!(d.step, "3");
        assert_eq!(d.level, 0);
    }

    #[test]
    fn merge_point_numbered_once() {
        // Diamond: a → {b, c} → d
        let graph = links(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let records = graph.sorted_with_order();
        assert_eq!(records.len(), 4);
        assert_eq!(
            records.iter().filter(|r| r.node == "d").count(),
            1,
            "merge point must appear once"
        );
        assert_eq!(
            steps(&graph),
            expect(&[("1", "a"), ("1.1", "c"), ("2", "b"), ("3", "d")])
        );
    }

    #[test]
    fn link_labels_are_carried() {
        let mut graph = Graph::new();
        graph.declare_link("Yes", "ask", "accept").unwrap();
        graph.declare_link("No", "ask", "reject").unwrap();

        let records = graph.sorted_with_order();
        let label_of = |node: &str| {
            records
                .iter()
                .find(|r| r.node == node)
                .and_then(|r| r.from_link_label.clone())
        };
        assert_eq!(label_of("ask"), None);
        assert_eq!(label_of("accept"), Some("Yes".to_string()));
        assert_eq!(label_of("reject"), Some("No".to_string()));
    }

    // -----------------------------------------------------------------------
    // Starting points
    // -----------------------------------------------------------------------

    #[test]
    fn alternate_starts_are_lettered_by_position() {
        let mut graph = Graph::new();
        graph.register("right", 200.0, 0.0);
        graph.register("left", 10.0, 0.0);
        graph.register("below", 10.0, 50.0);
        graph.declare_link("", "left", "join").unwrap();
        graph.declare_link("", "right", "join").unwrap();
        graph.declare_link("", "below", "other").unwrap();

        assert_eq!(
            steps(&graph),
            expect(&[
                ("1", "left"),
                ("2", "join"),
                ("A.1", "below"),
                ("A.2", "other"),
                ("B.1", "right"),
            ])
        );
    }

    #[test]
    fn numeric_start_branches_without_letters() {
        let graph = links(&[("a", "x"), ("b", "y")]);
        let options = OrderConfig {
            letter_branches: false,
            ..OrderConfig::default()
        };
        let records: Vec<_> = graph
            .sorted_with_order_using(&options)
            .into_iter()
            .map(|r| (r.step, r.node))
            .collect();
        assert_eq!(
            records,
            expect(&[("0.1", "b"), ("0.2", "y"), ("1", "a"), ("2", "x")])
        );
    }

    #[test]
    fn start_by_dependents_when_not_top_left() {
        let mut graph = Graph::new();
        graph.register("small", 0.0, 0.0);
        graph.register("big", 100.0, 0.0);
        graph.declare_link("", "small", "s1").unwrap();
        graph.declare_link("", "big", "b1").unwrap();
        graph.declare_link("", "b1", "b2").unwrap();

        let options = OrderConfig {
            start_top_left: false,
            ..OrderConfig::default()
        };
        let first = graph.sorted_with_order_using(&options);
        assert_eq!(first[0].node, "big");
        assert_eq!(first[0].step, "1");

        let by_position = graph.sorted_with_order();
        assert_eq!(by_position[0].node, "small");
    }

    #[test]
    fn custom_step_width() {
        let graph = links(&[("a", "b"), ("a", "c")]);
        let options = OrderConfig {
            step_width: 2,
            ..OrderConfig::default()
        };
        let sorted: Vec<String> = graph
            .sorted_with_order_using(&options)
            .into_iter()
            .map(|r| r.sorted_step)
            .collect();
        assert_eq!(sorted, vec!["01", "01.01", "02"]);
    }

    #[test]
    fn narrow_width_grows_with_node_count() {
        let mut graph = Graph::new();
        for i in 0..10_000_usize {
            graph.declare_dependency(i + 1, i).unwrap();
        }
        let options = OrderConfig {
            step_width: 2,
            ..OrderConfig::default()
        };
        let records = graph.sorted_with_order_using(&options);

        assert_eq!(records.len(), 10_001);
        assert_eq!(records[0].sorted_step, "00001");
        assert_eq!(records[99].step, "100");
        assert_eq!(records[99].sorted_step, "00100");
        assert_eq!(records[10_000].step, "10001");
        assert_eq!(records[10_000].sorted_step, "10001");
        assert!(records.windows(2).all(|w| w[0].sorted_step < w[1].sorted_step));
    }

    #[test]
    fn long_chain_is_numbered_without_deep_calls() {
        const LEN: usize = 150_000;
        let mut graph = Graph::new();
        for i in 0..LEN - 1 {
            graph.declare_dependency(i + 1, i).unwrap();
        }
        let records = graph.sorted_with_order();

        assert_eq!(records.len(), LEN);
        assert_eq!(records[0].node, 0);
        assert_eq!(records[0].step, "1");
        assert_eq!(records[LEN - 1].node, LEN - 1);
        assert_eq!(records[LEN - 1].step, "150000");
        assert!(records.iter().all(|r| r.level == 0));
        assert!(records.windows(2).all(|w| w[0].sorted_step < w[1].sorted_step));
    }

    #[test]
    fn branches_deep_in_a_chain_keep_preorder() {
        // 0 → 1 → … → 5, with a side branch off every step.
        let mut graph = Graph::new();
        for i in 0..5_usize {
            graph.declare_dependency(i + 1, i).unwrap();
        }
        for i in 0..5_usize {
            graph.declare_dependency(100 + i, i).unwrap();
        }
        let pairs: Vec<(String, usize)> = graph
            .sorted_with_order()
            .into_iter()
            .map(|r| (r.step, r.node))
            .collect();
        let expected: Vec<(String, usize)> = [
            ("1", 0),
            ("1.1", 100),
            ("2", 1),
            ("2.1", 101),
            ("3", 2),
            ("3.1", 102),
            ("4", 3),
            ("4.1", 103),
            ("5", 4),
            ("5.1", 104),
            ("6", 5),
        ]
        .into_iter()
        .map(|(s, n)| (s.to_string(), n))
        .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn orderings_are_repeatable() {
        let graph = links(&[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d")]);
        assert_eq!(graph.sorted_with_order(), graph.sorted_with_order());
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edge_count(), 4);
    }
}
