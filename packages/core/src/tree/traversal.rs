//! Completion & traversal engine
//!
//! Completion is only ever stored for leaves (the learner's checks). A
//! composite is complete when every child is, so its status is derived on each
//! query. The continue path is recomputed in full each time; course outlines
//! are human-authored and small.

use crate::error::{CurriculumError, IntegrityViolation, Result};
use crate::models::CurriculumNode;
use crate::tree::{Forest, NodeMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Leaf-level course progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    /// Leaves present in the completion set
    pub completed_leaves: usize,
    /// All leaves in the store
    pub total_leaves: usize,
}

impl CourseProgress {
    /// Completed share in `0.0..=1.0`; an empty course counts as done
    pub fn fraction(&self) -> f64 {
        if self.total_leaves == 0 {
            1.0
        } else {
            self.completed_leaves as f64 / self.total_leaves as f64
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completed_leaves == self.total_leaves
    }
}

/// Whether `node` is complete for a learner with `completed` checks
///
/// A leaf is complete when its id is checked. A composite is complete when all
/// of its children are; children are resolved through `nodes` and a missing
/// child is `NodeNotFound`. A node reached again below itself is a `Cycle`.
pub fn is_complete(
    node: &CurriculumNode,
    completed: &HashSet<String>,
    nodes: &NodeMap,
) -> Result<bool> {
    let mut on_path = Vec::new();
    complete_below(node, completed, nodes, &mut on_path)
}

fn complete_below<'a>(
    node: &'a CurriculumNode,
    completed: &HashSet<String>,
    nodes: &'a NodeMap,
    on_path: &mut Vec<&'a str>,
) -> Result<bool> {
    if node.is_leaf() {
        return Ok(completed.contains(&node.id));
    }
    if on_path.contains(&node.id.as_str()) {
        return Err(IntegrityViolation::Cycle {
            node_id: node.id.clone(),
        }
        .into());
    }

    on_path.push(node.id.as_str());
    for child_id in &node.subsections {
        let child = nodes
            .get(child_id)
            .ok_or_else(|| CurriculumError::node_not_found(child_id.as_str()))?;
        if !complete_below(child, completed, nodes, on_path)? {
            on_path.pop();
            return Ok(false);
        }
    }
    on_path.pop();
    Ok(true)
}

/// Root-to-leaf id path of the first unchecked leaf, pre-order
///
/// `None` once every leaf is checked. A node that appears inside its own
/// subtree is reported as a `Cycle`.
pub fn get_continue_path(
    completed: &HashSet<String>,
    forest: &Forest,
) -> Result<Option<Vec<String>>> {
    let mut path = Vec::new();
    for root_id in &forest.roots {
        if find_incomplete(root_id, completed, forest, &mut path)? {
            tracing::debug!("Continue path: {:?}", path);
            return Ok(Some(path));
        }
    }
    tracing::debug!("Continue path: course complete");
    Ok(None)
}

/// Depth-first search below `node_id`; leaves `path` pointing at the first
/// unchecked leaf and returns true, or restores `path` and returns false
fn find_incomplete(
    node_id: &str,
    completed: &HashSet<String>,
    forest: &Forest,
    path: &mut Vec<String>,
) -> Result<bool> {
    let node = forest.get(node_id)?;
    if path.iter().any(|id| id == node_id) {
        return Err(IntegrityViolation::Cycle {
            node_id: node_id.to_string(),
        }
        .into());
    }
    path.push(node.id.clone());

    if node.is_leaf() {
        if !completed.contains(&node.id) {
            return Ok(true);
        }
    } else {
        for child_id in &node.subsections {
            if find_incomplete(child_id, completed, forest, path)? {
                return Ok(true);
            }
        }
    }

    path.pop();
    Ok(false)
}

/// Count checked leaves against all leaves in the store
///
/// Composites never count, whatever their derived status.
pub fn course_completion(nodes: &NodeMap, completed: &HashSet<String>) -> CourseProgress {
    nodes
        .values()
        .filter(|node| node.is_leaf())
        .fold(CourseProgress::default(), |mut progress, leaf| {
            progress.total_leaves += 1;
            if completed.contains(&leaf.id) {
                progress.completed_leaves += 1;
            }
            progress
        })
}
