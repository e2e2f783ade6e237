use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for declaration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SelfReference,
    CycleDetected,
    LinkConflict,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SelfReference => "E1001",
            Self::CycleDetected => "E1002",
            Self::LinkConflict => "E1003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SelfReference => "Node cannot depend on itself",
            Self::CycleDetected => "Cycle would be created",
            Self::LinkConflict => "Conflicting link label",
        }
    }

    /// Optional remediation hint that can be surfaced to callers.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::SelfReference => Some("Drop the edge; a step never waits on itself."),
            Self::CycleDetected => {
                Some("Remove or reverse one of the links on the reported path.")
            }
            Self::LinkConflict => {
                Some("Give each ordered pair of nodes at most one branch label.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors returned when declaring nodes, dependencies or links.
///
/// Node identifiers are captured through their `Debug` rendering so the error
/// stays independent of the graph's id type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// `child == parent`.
    #[error("node {node} cannot depend on itself")]
    SelfReference {
        /// The node named on both ends of the edge.
        node: String,
    },

    /// The parent already (transitively) depends on the child.
    #[error("dependency {child} -> {parent} would create a cycle: {}", .path.join(" → "))]
    Cycle {
        /// The dependent end of the rejected edge.
        child: String,
        /// The prerequisite end of the rejected edge.
        parent: String,
        /// Closed path following depends-on edges, starting and ending at `child`.
        path: Vec<String>,
    },

    /// A differing label already exists for the same ordered pair.
    #[error("link {from} -> {to} is already labelled {existing:?}; refusing {requested:?}")]
    LinkConflict {
        from: String,
        to: String,
        existing: String,
        requested: String,
    },
}

impl GraphError {
    pub(crate) fn self_reference(node: &impl fmt::Debug) -> Self {
        Self::SelfReference {
            node: render_id(node),
        }
    }

    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SelfReference { .. } => ErrorCode::SelfReference,
            Self::Cycle { .. } => ErrorCode::CycleDetected,
            Self::LinkConflict { .. } => ErrorCode::LinkConflict,
        }
    }
}

pub(crate) fn render_id(id: &impl fmt::Debug) -> String {
    format!("{id:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::SelfReference,
            ErrorCode::CycleDetected,
            ErrorCode::LinkConflict,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
            assert!(code.hint().is_some());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CycleDetected.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn cycle_error_renders_path() {
        let err = GraphError::Cycle {
            child: "\"a\"".to_string(),
            parent: "\"c\"".to_string(),
            path: vec![
                "\"a\"".to_string(),
                "\"c\"".to_string(),
                "\"b\"".to_string(),
                "\"a\"".to_string(),
            ],
        };
        let display = err.to_string();
        assert!(display.contains("\"a\" → \"c\" → \"b\" → \"a\""), "display: {display}");
        assert_eq!(err.code(), ErrorCode::CycleDetected);
    }

    #[test]
    fn self_reference_uses_debug_rendering() {
        let err = GraphError::self_reference(&"z");
        assert_eq!(err.to_string(), "node \"z\" cannot depend on itself");
        assert_eq!(err.code().code(), "E1001");
    }
}
