//! Node store and root list
//!
//! [`Forest`] is the whole outline state: an id-keyed node store plus the
//! ordered list of top-level section ids. It serializes to the current document
//! format `{ "roots": [...], "nodes": {...} }`.
//!
//! Mutators in [`crate::tree`] never edit a forest in place; they clone it,
//! change the clone and hand it back, so a host can swap whole states
//! atomically.

use crate::error::{CurriculumError, Result};
use crate::models::CurriculumNode;
use crate::tree::ParentIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// id → node mapping
pub type NodeMap = HashMap<String, CurriculumNode>;

/// A curriculum outline: node store plus root list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    /// Ordered top-level section ids
    #[serde(default)]
    pub roots: Vec<String>,

    /// Node store
    #[serde(default)]
    pub nodes: NodeMap,
}

impl Forest {
    pub fn new(roots: Vec<String>, nodes: NodeMap) -> Self {
        Self { roots, nodes }
    }

    /// Build a forest from a list of records, keyed by their own ids
    pub fn from_nodes(roots: Vec<String>, nodes: impl IntoIterator<Item = CurriculumNode>) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        Self { roots, nodes }
    }

    /// Look up a node, failing with `NodeNotFound` for unknown ids
    pub fn get(&self, node_id: &str) -> Result<&CurriculumNode> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| CurriculumError::node_not_found(node_id))
    }

    pub(crate) fn get_mut(&mut self, node_id: &str) -> Result<&mut CurriculumNode> {
        self.nodes
            .get_mut(node_id)
            .ok_or_else(|| CurriculumError::node_not_found(node_id))
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Replace the node store wholesale, returning the previous one
    pub fn replace_all(&mut self, nodes: NodeMap) -> NodeMap {
        std::mem::replace(&mut self.nodes, nodes)
    }

    /// Replace the root list wholesale, returning the previous one
    pub fn replace_roots(&mut self, roots: Vec<String>) -> Vec<String> {
        std::mem::replace(&mut self.roots, roots)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_root(&self, node_id: &str) -> bool {
        self.roots.iter().any(|id| id == node_id)
    }

    /// All leaves in the store, in no particular order
    pub fn leaves(&self) -> impl Iterator<Item = &CurriculumNode> {
        self.nodes.values().filter(|node| node.is_leaf())
    }

    /// Build a child → parent index over the current structure
    pub fn parent_index(&self) -> Result<ParentIndex> {
        ParentIndex::build(self)
    }

    /// Ordered children of `parent_id`, or the root list when `parent_id` is
    /// `None`
    pub fn sibling_list(&self, parent_id: Option<&str>) -> Result<&[String]> {
        match parent_id {
            Some(parent_id) => Ok(&self.get(parent_id)?.subsections),
            None => Ok(&self.roots),
        }
    }

    pub(crate) fn sibling_list_mut(&mut self, parent_id: Option<&str>) -> Result<&mut Vec<String>> {
        match parent_id {
            Some(parent_id) => Ok(&mut self.get_mut(parent_id)?.subsections),
            None => Ok(&mut self.roots),
        }
    }
}
