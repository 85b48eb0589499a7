//! Curriculum Tree Model
//!
//! The outline is a forest: an id-keyed node store plus an ordered root list.
//!
//! - [`Forest`] - node store + root list
//! - [`mutators`] - insert / move / delete / edit, each returning a new forest
//! - [`traversal`] - derived completion, continue path, course progress
//! - [`ParentIndex`] - O(1) child → parent lookup
//! - [`validate_forest`] - invariant and limit checks
//! - [`legacy`] - nested legacy format import and re-nesting
//!
//! # Invariants
//!
//! 1. Every id in the root list or in any `subsections` is in the store.
//! 2. Every id has at most one parent, and roots have none.
//! 3. Following `subsections` from a root never revisits a node.

mod forest;
pub mod legacy;
pub mod mutators;
mod parent_index;
pub mod traversal;
mod validate;

pub use forest::{Forest, NodeMap};
pub use legacy::{extract_nodes, nest_forest};
pub use mutators::{
    delete_section, get_parent_id, insert, insert_node, move_section, update_node,
    InsertLocation, MoveDirection,
};
pub use parent_index::ParentIndex;
pub use traversal::{course_completion, get_continue_path, is_complete, CourseProgress};
pub use validate::validate_forest;
