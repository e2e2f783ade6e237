//! Dependency graph engine producing layered and hierarchical step orders.
//!
//! Build a [`Graph`] from depends-on declarations or labelled links, then ask
//! for either ordering:
//!
//! - [`Graph::sorted_layers`] groups nodes into levels that can run in
//!   parallel.
//! - [`Graph::sorted_with_order`] numbers every node like a hand-drawn
//!   flowchart (`1`, `2`, `2.1`, `A.1`).
//!
//! ```rust
//! use seqdag_core::Graph;
//!
//! let mut graph = Graph::new();
//! graph.declare_link("", "a", "b")?;
//! graph.declare_link("", "b", "c")?;
//!
//! let steps: Vec<_> = graph.sorted_with_order().into_iter().map(|r| r.step).collect();
//! assert_eq!(steps, ["1", "2", "3"]);
//! # Ok::<(), seqdag_core::GraphError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: declarations return [`GraphError`]; configuration loading
//!   uses `anyhow::Result`.
//! - **Logging**: `tracing` macros only; installing a subscriber is left to
//!   the binary.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod order;

pub use config::{CyclePolicy, EngineConfig, GraphConfig, OrderConfig, load_config};
pub use error::{ErrorCode, GraphError};
pub use graph::{Graph, Node, NodeId};
pub use order::TopologyOrder;
