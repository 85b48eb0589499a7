//! Legacy structure importer
//!
//! Older documents stored the outline as nested records, each embedding its
//! children under `subsections`. [`extract_nodes`] flattens that into the
//! id-keyed store plus root list; [`nest_forest`] goes the other way.
//!
//! Only call [`extract_nodes`] on input that
//! [`StoredDocument::from_value`](crate::models::StoredDocument::from_value)
//! identified as legacy, once per document.

use crate::error::{IntegrityViolation, Result};
use crate::models::{CurriculumNode, NestedNodeRecord};
use crate::tree::Forest;
use uuid::Uuid;

/// Flatten nested legacy records into a forest
///
/// Every record's non-`subsections` fields are kept as is and child order is
/// preserved. Records without an id get a fresh one. An id that occurs twice
/// is a structural defect.
pub fn extract_nodes(records: Vec<NestedNodeRecord>) -> Result<Forest> {
    let mut forest = Forest::default();
    for record in records {
        let root_id = flatten(record, &mut forest)?;
        forest.roots.push(root_id);
    }
    tracing::info!(
        "Imported legacy outline: {} root(s), {} node(s)",
        forest.roots.len(),
        forest.len()
    );
    Ok(forest)
}

fn flatten(record: NestedNodeRecord, forest: &mut Forest) -> Result<String> {
    let NestedNodeRecord {
        id,
        title,
        description,
        subsections,
        links,
        quiz,
        notes,
        extra,
    } = record;

    let id = if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id
    };
    if forest.contains(&id) {
        return Err(IntegrityViolation::DuplicateParent { node_id: id }.into());
    }
    // claim the id before descending so a repeated id inside the subtree is caught
    forest
        .nodes
        .insert(id.clone(), CurriculumNode::with_id(id.clone(), String::new()));

    let mut child_ids = Vec::with_capacity(subsections.len());
    for child in subsections {
        child_ids.push(flatten(child, forest)?);
    }

    forest.nodes.insert(
        id.clone(),
        CurriculumNode {
            id: id.clone(),
            title,
            description,
            subsections: child_ids,
            links,
            quiz,
            notes,
            extra,
        },
    );
    Ok(id)
}

/// Rebuild the nested legacy shape by walking roots and subsections
pub fn nest_forest(forest: &Forest) -> Result<Vec<NestedNodeRecord>> {
    forest
        .roots
        .iter()
        .map(|root_id| nest(root_id, forest, 0))
        .collect()
}

fn nest(node_id: &str, forest: &Forest, depth: usize) -> Result<NestedNodeRecord> {
    if depth > forest.len() {
        return Err(IntegrityViolation::Cycle {
            node_id: node_id.to_string(),
        }
        .into());
    }
    let node = forest.get(node_id)?;
    let subsections = node
        .subsections
        .iter()
        .map(|child_id| nest(child_id, forest, depth + 1))
        .collect::<Result<Vec<_>>>()?;

    Ok(NestedNodeRecord {
        id: node.id.clone(),
        title: node.title.clone(),
        description: node.description.clone(),
        subsections,
        links: node.links.clone(),
        quiz: node.quiz.clone(),
        notes: node.notes.clone(),
        extra: node.extra.clone(),
    })
}
