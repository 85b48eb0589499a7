//! Child → parent reverse index
//!
//! [`crate::tree::get_parent_id`] answers "who is my parent" with a linear scan
//! over every node. For hosts that ask often (move buttons, breadcrumbs) this
//! index answers in O(1).
//!
//! # Invalidation
//!
//! The index is a snapshot of one forest. Mutators return new forests, so the
//! host rebuilds the index whenever it swaps in a new forest; an index built
//! from an older forest must not be consulted.

use crate::error::{IntegrityViolation, Result};
use crate::tree::Forest;
use std::collections::{HashMap, HashSet};

/// O(1) parent lookup built from a single forest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentIndex {
    /// Map: child id → parent id (roots are absent)
    parents: HashMap<String, String>,
    roots: HashSet<String>,
}

impl ParentIndex {
    /// Index every `subsections` edge of `forest`
    ///
    /// Fails with `DuplicateParent` when an id has two parents, appears twice
    /// in one parent, or is both a root and a child.
    pub fn build(forest: &Forest) -> Result<Self> {
        let mut parents = HashMap::with_capacity(forest.len());

        for (parent_id, node) in &forest.nodes {
            for child_id in &node.subsections {
                if parents
                    .insert(child_id.clone(), parent_id.clone())
                    .is_some()
                {
                    return Err(IntegrityViolation::DuplicateParent {
                        node_id: child_id.clone(),
                    }
                    .into());
                }
            }
        }

        if let Some(root_id) = forest.roots.iter().find(|id| parents.contains_key(*id)) {
            return Err(IntegrityViolation::DuplicateParent {
                node_id: root_id.clone(),
            }
            .into());
        }

        Ok(Self {
            parents,
            roots: forest.roots.iter().cloned().collect(),
        })
    }

    /// Parent of `node_id`, or `None` for roots and unknown ids
    pub fn parent_of(&self, node_id: &str) -> Option<&str> {
        self.parents.get(node_id).map(String::as_str)
    }

    /// True if `node_id` is in the root list of the indexed forest
    ///
    /// Unknown ids are not roots.
    pub fn is_root(&self, node_id: &str) -> bool {
        self.roots.contains(node_id)
    }

    /// Ancestors of `node_id`, nearest first
    pub fn ancestors(&self, node_id: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = node_id;
        while let Some(parent) = self.parent_of(current) {
            // a cycle would loop forever; the forest validator reports it
            if chain.contains(&parent) || chain.len() > self.parents.len() {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
