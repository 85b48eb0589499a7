//! Curriculum Core
//!
//! This crate provides the course outline model for the curriculum editor:
//! a forest of sections, the pure operations that edit it, and the derived
//! learner progress computed from a set of checked sections.
//!
//! # Architecture
//!
//! - **Flat node store**: nodes keyed by id, children referenced by id
//! - **Copy-on-write edits**: every mutator returns a new forest and leaves its input untouched
//! - **Derived completion**: only leaves are checked; composites are complete when all children are
//! - **Legacy import**: the old nested document shape is flattened once on load
//!
//! # Modules
//!
//! - [`models`] - Data structures (CurriculumNode, CompletionState, stored documents)
//! - [`tree`] - Forest, mutators, traversal, validation and legacy import
//! - [`services`] - Editor session, events, loading and snapshot sinks
//! - [`config`] - Editor configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tree;

// Re-export commonly used types
pub use config::CurriculumConfig;
pub use error::{CurriculumError, IntegrityViolation, Result};
pub use models::*;
pub use services::*;
pub use tree::{
    course_completion, delete_section, extract_nodes, get_continue_path, get_parent_id, insert,
    insert_node, is_complete, move_section, nest_forest, update_node, validate_forest,
    CourseProgress, Forest, InsertLocation, MoveDirection, NodeMap, ParentIndex,
};
