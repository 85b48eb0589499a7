//! Forest integrity validation
//!
//! Checks, in order:
//!
//! 1. every store key matches its record's id
//! 2. node count is within `max_nodes`
//! 3. every root and every subsection id exists in the store
//! 4. no id has two parents, and no root is also a child
//! 5. walking from the roots never revisits a node, and never goes deeper than
//!    `max_depth`
//! 6. every store entry is reachable from some root
//!
//! The first violation found is returned. Nothing is repaired.

use crate::config::CurriculumConfig;
use crate::error::{IntegrityViolation, Result};
use crate::tree::{Forest, ParentIndex};
use std::collections::HashSet;

/// Validate `forest` against the tree invariants and `config` limits
pub fn validate_forest(forest: &Forest, config: &CurriculumConfig) -> Result<()> {
    let result = check(forest, config);
    if let Err(err) = &result {
        tracing::warn!("Forest failed validation: {}", err);
    }
    result
}

fn check(forest: &Forest, config: &CurriculumConfig) -> Result<()> {
    for (key, node) in &forest.nodes {
        if key != &node.id {
            return Err(IntegrityViolation::IdMismatch {
                key: key.clone(),
                node_id: node.id.clone(),
            }
            .into());
        }
    }

    if forest.len() > config.max_nodes {
        return Err(IntegrityViolation::TooManyNodes {
            count: forest.len(),
            max_nodes: config.max_nodes,
        }
        .into());
    }

    if let Some(root_id) = forest.roots.iter().find(|id| !forest.contains(id)) {
        return Err(IntegrityViolation::DanglingReference {
            parent_id: None,
            child_id: root_id.clone(),
        }
        .into());
    }
    for node in forest.nodes.values() {
        if let Some(child_id) = node.subsections.iter().find(|id| !forest.contains(id)) {
            return Err(IntegrityViolation::DanglingReference {
                parent_id: Some(node.id.clone()),
                child_id: child_id.clone(),
            }
            .into());
        }
    }

    let mut seen_roots = HashSet::new();
    if let Some(root_id) = forest.roots.iter().find(|id| !seen_roots.insert(*id)) {
        return Err(IntegrityViolation::DuplicateParent {
            node_id: root_id.clone(),
        }
        .into());
    }
    ParentIndex::build(forest)?;

    // With single parentage established, a revisit during the walk can only
    // come from a cycle.
    let mut visited = HashSet::with_capacity(forest.len());
    let mut stack: Vec<(&str, usize)> = forest.roots.iter().rev().map(|id| (id.as_str(), 1)).collect();
    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            return Err(IntegrityViolation::Cycle {
                node_id: id.to_string(),
            }
            .into());
        }
        if depth > config.max_depth {
            return Err(IntegrityViolation::TooDeep {
                node_id: id.to_string(),
                depth,
                max_depth: config.max_depth,
            }
            .into());
        }
        let node = forest.get(id)?;
        stack.extend(node.subsections.iter().rev().map(|child| (child.as_str(), depth + 1)));
    }

    if let Some(orphan) = forest.nodes.keys().find(|id| !visited.contains(id.as_str())) {
        // a store-only cycle (no root) also lands here
        return Err(IntegrityViolation::Unreachable {
            node_id: orphan.clone(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurriculumError;
    use crate::models::CurriculumNode;

    fn valid() -> Forest {
        Forest::from_nodes(
            vec!["s1".to_string(), "s2".to_string()],
            vec![
                CurriculumNode::with_id("s1", "One").with_subsections(["s1a", "s1b"]),
                CurriculumNode::with_id("s1a", "One A"),
                CurriculumNode::with_id("s1b", "One B"),
                CurriculumNode::with_id("s2", "Two"),
            ],
        )
    }

    fn violation(forest: &Forest, config: &CurriculumConfig) -> IntegrityViolation {
        match validate_forest(forest, config) {
            Err(CurriculumError::StructuralIntegrity(v)) => v,
            other => panic!("Expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_forest_passes() {
        assert!(validate_forest(&valid(), &CurriculumConfig::default()).is_ok());
        assert!(validate_forest(&Forest::default(), &CurriculumConfig::default()).is_ok());
    }

    #[test]
    fn test_dangling_child() {
        let mut forest = valid();
        forest.get_mut("s2").unwrap().subsections = vec!["ghost".to_string()];
        assert_eq!(
            violation(&forest, &CurriculumConfig::default()),
            IntegrityViolation::DanglingReference {
                parent_id: Some("s2".to_string()),
                child_id: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_root() {
        let mut forest = valid();
        forest.roots.push("ghost".to_string());
        assert!(matches!(
            violation(&forest, &CurriculumConfig::default()),
            IntegrityViolation::DanglingReference { parent_id: None, .. }
        ));
    }

    #[test]
    fn test_duplicate_root_entry() {
        let mut forest = valid();
        forest.roots.push("s2".to_string());
        assert!(matches!(
            violation(&forest, &CurriculumConfig::default()),
            IntegrityViolation::DuplicateParent { .. }
        ));
    }

    #[test]
    fn test_cycle_without_root_is_unreachable() {
        let mut forest = valid();
        forest.nodes.insert(
            "x".to_string(),
            CurriculumNode::with_id("x", "X").with_subsections(["y"]),
        );
        forest.nodes.insert(
            "y".to_string(),
            CurriculumNode::with_id("y", "Y").with_subsections(["x"]),
        );
        assert!(matches!(
            violation(&forest, &CurriculumConfig::default()),
            IntegrityViolation::Unreachable { .. }
        ));
    }

    #[test]
    fn test_self_cycle_under_root() {
        let mut forest = valid();
        // s1b lists s1 as a child: s1 becomes both root and child
        forest.get_mut("s1b").unwrap().subsections = vec!["s1".to_string()];
        assert!(validate_forest(&forest, &CurriculumConfig::default()).is_err());
    }

    #[test]
    fn test_id_mismatch() {
        let mut forest = valid();
        let node = forest.nodes.remove("s2").unwrap();
        forest.nodes.insert("other".to_string(), node);
        assert!(matches!(
            violation(&forest, &CurriculumConfig::default()),
            IntegrityViolation::IdMismatch { .. }
        ));
    }

    #[test]
    fn test_limits() {
        let config = CurriculumConfig {
            max_depth: 1,
            ..Default::default()
        };
        assert!(matches!(
            violation(&valid(), &config),
            IntegrityViolation::TooDeep { depth: 2, .. }
        ));

        let config = CurriculumConfig {
            max_nodes: 3,
            ..Default::default()
        };
        assert_eq!(
            violation(&valid(), &config),
            IntegrityViolation::TooManyNodes {
                count: 4,
                max_nodes: 3
            }
        );
    }
}
