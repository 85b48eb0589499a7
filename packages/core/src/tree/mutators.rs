//! Tree mutators
//!
//! Every mutator takes the current [`Forest`] by reference and returns a new
//! one; the input is never modified. A host applies the result as one
//! whole-state replacement, so readers never see a half-applied edit.
//!
//! | operation | effect |
//! |---|---|
//! | [`insert`] | new leaf above/below a node, or as its first subsection |
//! | [`move_section`] | swap a node with its adjacent sibling |
//! | [`delete_section`] | remove a node and its whole subtree |
//! | [`update_node`] | edit title/description/links/quiz/notes |
//! | [`get_parent_id`] | linear-scan parent lookup |

use crate::error::{CurriculumError, IntegrityViolation, Result};
use crate::models::{CurriculumNode, NodeUpdate, DEFAULT_SECTION_TITLE};
use crate::tree::{Forest, NodeMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where a new node goes relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertLocation {
    /// Sibling immediately before the target
    Above,
    /// Sibling immediately after the target
    Below,
    /// First child of the target
    Subsection,
}

/// Direction of an adjacent-sibling swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn from_move_up(move_up: bool) -> Self {
        if move_up {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Insert a fresh "New Section" leaf relative to `target_id`
///
/// Returns the new forest and the generated node id.
pub fn insert(
    forest: &Forest,
    location: InsertLocation,
    target_id: &str,
) -> Result<(Forest, String)> {
    let node = CurriculumNode::new_section(DEFAULT_SECTION_TITLE);
    let node_id = node.id.clone();
    let next = insert_node(forest, location, target_id, node)?;
    Ok((next, node_id))
}

/// Insert a caller-built node relative to `target_id`
///
/// The node must be a leaf whose id is not already in the store.
pub fn insert_node(
    forest: &Forest,
    location: InsertLocation,
    target_id: &str,
    node: CurriculumNode,
) -> Result<Forest> {
    if !forest.contains(target_id) {
        return Err(CurriculumError::node_not_found(target_id));
    }
    if forest.contains(&node.id) {
        return Err(IntegrityViolation::DuplicateParent {
            node_id: node.id.clone(),
        }
        .into());
    }
    if let Some(child_id) = node.subsections.first() {
        return Err(IntegrityViolation::DanglingReference {
            parent_id: Some(node.id.clone()),
            child_id: child_id.clone(),
        }
        .into());
    }

    let mut next = forest.clone();
    let node_id = node.id.clone();

    match location {
        InsertLocation::Subsection => {
            next.get_mut(target_id)?.subsections.insert(0, node_id.clone());
        }
        InsertLocation::Above | InsertLocation::Below => {
            let parent_id = get_parent_id(&next.nodes, target_id).map(str::to_owned);
            let siblings = next.sibling_list_mut(parent_id.as_deref())?;
            let position = siblings
                .iter()
                .position(|id| id == target_id)
                .ok_or_else(|| CurriculumError::node_not_found(target_id))?;
            let at = match location {
                InsertLocation::Above => position,
                _ => position + 1,
            };
            siblings.insert(at, node_id.clone());
        }
    }

    next.nodes.insert(node_id.clone(), node);
    tracing::debug!(
        "Inserted node {} {:?} target {}",
        node_id,
        location,
        target_id
    );
    Ok(next)
}

/// Swap `node_id` with its neighbour in the sibling list under `parent_id`
/// (the root list when `parent_id` is `None`)
///
/// Moving the first sibling up or the last one down returns an unchanged
/// forest.
pub fn move_section(
    forest: &Forest,
    parent_id: Option<&str>,
    node_id: &str,
    direction: MoveDirection,
) -> Result<Forest> {
    let siblings = forest.sibling_list(parent_id)?;
    let position = siblings
        .iter()
        .position(|id| id == node_id)
        .ok_or_else(|| CurriculumError::node_not_found(node_id))?;

    let neighbour = match direction {
        MoveDirection::Up => position.checked_sub(1),
        MoveDirection::Down => Some(position + 1).filter(|&i| i < siblings.len()),
    };
    let Some(neighbour) = neighbour else {
        tracing::warn!(
            "Ignoring move {:?} of {}: already at the boundary",
            direction,
            node_id
        );
        return Ok(forest.clone());
    };

    let mut next = forest.clone();
    next.sibling_list_mut(parent_id)?.swap(position, neighbour);
    tracing::debug!("Moved node {} {:?}", node_id, direction);
    Ok(next)
}

/// Remove `node_id` and every descendant
///
/// The id is also unlinked from its parent's subsections, or from the root
/// list when it is top-level.
pub fn delete_section(forest: &Forest, node_id: &str) -> Result<Forest> {
    if !forest.contains(node_id) {
        return Err(CurriculumError::node_not_found(node_id));
    }

    let doomed = collect_subtree(&forest.nodes, node_id);
    let parent_id = get_parent_id(&forest.nodes, node_id).map(str::to_owned);

    let mut next = forest.clone();
    next.sibling_list_mut(parent_id.as_deref())?
        .retain(|id| id != node_id);
    for id in &doomed {
        next.nodes.remove(id);
    }

    tracing::debug!(
        "Deleted node {} with {} descendant(s)",
        node_id,
        doomed.len() - 1
    );
    Ok(next)
}

/// Apply `update` to the non-structural fields of `node_id`
pub fn update_node(forest: &Forest, node_id: &str, update: NodeUpdate) -> Result<Forest> {
    let mut next = forest.clone();
    next.get_mut(node_id)?.apply_update(update);
    tracing::debug!("Updated node {}", node_id);
    Ok(next)
}

/// Find the parent of `node_id` by scanning every node's subsections
///
/// `None` for roots and unknown ids.
pub fn get_parent_id<'a>(nodes: &'a NodeMap, node_id: &str) -> Option<&'a str> {
    nodes
        .values()
        .find(|node| node.subsections.iter().any(|id| id == node_id))
        .map(|node| node.id.as_str())
}

/// `root_id` plus all ids reachable from it, pre-order
///
/// Dangling child ids are skipped; revisits are ignored so a malformed
/// cyclic store still terminates.
pub(crate) fn collect_subtree(nodes: &NodeMap, root_id: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![root_id.to_string()];

    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(node) = nodes.get(&id) {
            stack.extend(node.subsections.iter().rev().cloned());
        }
        order.push(id);
    }
    order
}

#[cfg(test)]
#[path = "mutators_test.rs"]
mod mutators_test;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_direction_from_bool() {
        assert_eq!(MoveDirection::from_move_up(true), MoveDirection::Up);
        assert_eq!(MoveDirection::from_move_up(false), MoveDirection::Down);
    }

    #[test]
    fn test_location_serde_names() {
        assert_eq!(
            serde_json::to_string(&InsertLocation::Subsection).unwrap(),
            "\"subsection\""
        );
        let above: InsertLocation = serde_json::from_str("\"above\"").unwrap();
        assert_eq!(above, InsertLocation::Above);
    }
}
