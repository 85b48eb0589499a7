//! Error types for the curriculum tree model
//!
//! Every tree operation returns [`Result`]. Lookups of unknown ids surface as
//! [`CurriculumError::NodeNotFound`] and broken forests surface as
//! [`CurriculumError::StructuralIntegrity`]. Neither is repaired in place: both
//! indicate a bug in the caller or corrupted persisted data.
//!
//! # Examples
//!
//! ```rust
//! use curriculum_core::{CurriculumError, IntegrityViolation};
//!
//! let err = CurriculumError::node_not_found("s1a");
//! assert_eq!(err.to_string(), "Node 's1a' does not exist");
//!
//! let err = CurriculumError::from(IntegrityViolation::Cycle {
//!     node_id: "s1".to_string(),
//! });
//! assert!(err.is_structural());
//! ```

use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, CurriculumError>;

/// A specific way in which a forest breaks the tree invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// A `subsections` entry (or a root entry when `parent_id` is `None`)
    /// names an id that is not in the node store
    #[error(
        "'{}' referenced by {} is missing from the node store",
        .child_id,
        parent_label(.parent_id)
    )]
    DanglingReference {
        parent_id: Option<String>,
        child_id: String,
    },

    /// The id is referenced by two parents, twice by the same parent, or is
    /// both a root and a child
    #[error("Node '{node_id}' has more than one parent")]
    DuplicateParent { node_id: String },

    /// Following `subsections` from a root revisits this node
    #[error("Cycle detected at node '{node_id}'")]
    Cycle { node_id: String },

    /// Store key and the record's own id disagree
    #[error("Store key '{key}' holds node with id '{node_id}'")]
    IdMismatch { key: String, node_id: String },

    /// The node is in the store but not reachable from any root
    #[error("Node '{node_id}' is not reachable from any root")]
    Unreachable { node_id: String },

    /// Nesting exceeds the configured depth limit
    #[error("Node '{node_id}' is nested {depth} levels deep (limit {max_depth})")]
    TooDeep {
        node_id: String,
        depth: usize,
        max_depth: usize,
    },

    /// Node store exceeds the configured size limit
    #[error("Forest holds {count} nodes (limit {max_nodes})")]
    TooManyNodes { count: usize, max_nodes: usize },
}

fn parent_label(parent_id: &Option<String>) -> String {
    match parent_id {
        Some(id) => format!("'{}'", id),
        None => "the root list".to_string(),
    }
}

/// Errors raised by curriculum tree operations
#[derive(Error, Debug)]
pub enum CurriculumError {
    /// Referenced node does not exist
    ///
    /// Raised by lookups, mutators and traversal when an id is absent from the
    /// node store. Hosts should treat this as a defect, not a user-facing
    /// condition.
    #[error("Node '{node_id}' does not exist")]
    NodeNotFound { node_id: String },

    /// The forest violates one of the tree invariants
    #[error("Structural integrity violated: {0}")]
    StructuralIntegrity(#[from] IntegrityViolation),

    /// A learner check was requested on a section that has subsections
    ///
    /// Only leaves are checked; a composite's completion is derived.
    #[error("Node '{node_id}' has subsections and cannot be checked")]
    NotALeaf { node_id: String },

    /// Persisted data is neither the current nor the legacy document shape
    #[error("Unrecognised curriculum document: {reason}")]
    LegacyFormat { reason: String },

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration failed validation or could not be read
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The snapshot sink rejected a save
    #[error("Persistence failed: {context}")]
    Persistence { context: String },
}

impl CurriculumError {
    /// Create a NodeNotFound error
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    /// Create a NotALeaf error
    pub fn not_a_leaf(node_id: impl Into<String>) -> Self {
        Self::NotALeaf {
            node_id: node_id.into(),
        }
    }

    /// Create a LegacyFormat error
    pub fn legacy_format(reason: impl Into<String>) -> Self {
        Self::LegacyFormat {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a Persistence error
    pub fn persistence(context: impl Into<String>) -> Self {
        Self::Persistence {
            context: context.into(),
        }
    }

    /// True for errors that indicate a malformed forest
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralIntegrity(_))
    }

    /// True for errors raised on unknown node ids
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_error() {
        let err = CurriculumError::node_not_found("missing-node");
        assert!(err.is_not_found());
        assert_eq!(format!("{}", err), "Node 'missing-node' does not exist");
    }

    #[test]
    fn test_not_a_leaf_error() {
        let err = CurriculumError::not_a_leaf("s1");
        assert!(!err.is_structural());
        assert_eq!(err.to_string(), "Node 's1' has subsections and cannot be checked");
    }

    #[test]
    fn test_dangling_reference_messages() {
        let from_parent = IntegrityViolation::DanglingReference {
            parent_id: Some("s1".to_string()),
            child_id: "ghost".to_string(),
        };
        assert_eq!(
            from_parent.to_string(),
            "'ghost' referenced by 's1' is missing from the node store"
        );

        let from_roots = IntegrityViolation::DanglingReference {
            parent_id: None,
            child_id: "ghost".to_string(),
        };
        assert_eq!(
            from_roots.to_string(),
            "'ghost' referenced by the root list is missing from the node store"
        );
    }

    #[test]
    fn test_structural_error_wraps_violation() {
        let err: CurriculumError = IntegrityViolation::DuplicateParent {
            node_id: "s2".to_string(),
        }
        .into();
        assert!(err.is_structural());
        assert!(!err.is_not_found());
        assert_eq!(
            format!("{}", err),
            "Structural integrity violated: Node 's2' has more than one parent"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json")
            .expect_err("Should fail to parse");
        let err: CurriculumError = json_error.into();
        assert!(matches!(err, CurriculumError::Serialization(_)));
    }

    #[test]
    fn test_persistence_error() {
        let err = CurriculumError::persistence("backend returned 503");
        assert_eq!(format!("{}", err), "Persistence failed: backend returned 503");
    }
}
