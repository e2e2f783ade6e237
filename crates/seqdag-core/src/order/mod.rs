//! Orderings derived from a [`Graph`](crate::Graph).
//!
//! ## Submodules
//!
//! - `layers` — Layered topological sort (`sorted_layers`, `sorted`,
//!   `layer_map`).
//! - `hierarchy` — Hierarchical step numbering (`sorted_with_order`).
//! - `steps` — Human and zero-padded step label spelling.
//!
//! Every ordering works on its own snapshot, so the source graph is never
//! mutated and orderings may run concurrently over a shared `&Graph`.

mod hierarchy;
mod layers;
mod steps;

use serde::Serialize;

/// One numbered step of a hierarchical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyOrder<N> {
    pub node: N,
    /// Human label such as `8.2.1` or `A.1`.
    pub step: String,
    /// `step` with numeric components zero-padded; sorts lexicographically.
    pub sorted_step: String,
    /// Branch depth, `0` on the main path.
    pub level: usize,
    /// Label of the link from the step this one was reached from.
    pub from_link_label: Option<String>,
}
