//! Engine configuration.
//!
//! Knobs are loaded from a TOML file shaped like:
//!
//! ```toml
//! [graph]
//! cycle_policy = "reject"
//!
//! [order]
//! step_width = 4
//! letter_branches = true
//! start_top_left = true
//! ```
//!
//! Every key is optional. A missing file yields [`EngineConfig::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub order: OrderConfig,
}

/// How dependency declarations treat edges that would close a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Refuse the edge with [`crate::GraphError::Cycle`].
    #[default]
    Reject,
    /// Accept the edge. Orderings skip nodes trapped in cycles and log a
    /// warning; use [`crate::Graph::find_cycles`] to inspect them.
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GraphConfig {
    #[serde(default)]
    pub cycle_policy: CyclePolicy,
}

/// Options for the hierarchical step assigner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Minimum zero-padding width of numeric components in `sorted_step`.
    /// Raised to the node count's digit count when that is wider.
    #[serde(default = "default_step_width")]
    pub step_width: usize,
    /// Label alternate top-level paths `A.`, `B.`, ... instead of numbering them.
    #[serde(default = "default_true")]
    pub letter_branches: bool,
    /// Order the starting leaves by coordinate (x, then y) rather than by
    /// dependent count.
    #[serde(default = "default_true")]
    pub start_top_left: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            step_width: default_step_width(),
            letter_branches: default_true(),
            start_top_left: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_step_width() -> usize {
    4
}

/// Load an [`EngineConfig`] from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
