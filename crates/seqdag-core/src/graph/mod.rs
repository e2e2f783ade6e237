//! Graph storage and the primitives orderings are built from.
//!
//! ## Submodules
//!
//! - [`registry`] — Node registry, mirrored edge index and declarations.
//! - `closure` — Breadth-first transitive dependency/dependent sets.
//! - `snapshot` — The shrinking copy orderings remove nodes from.
//! - `cycles` — Cycle diagnostics for permissively built graphs.

mod closure;
mod cycles;
pub mod registry;
pub(crate) mod snapshot;

pub use registry::{Graph, Node, NodeId};
