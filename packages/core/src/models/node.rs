//! Curriculum Node Data Structures
//!
//! This module defines [`CurriculumNode`], one entry of a course outline, and
//! the types that hang off it.
//!
//! # Leaf vs. composite
//!
//! The only discriminator is `subsections`:
//!
//! - **Leaf**: `subsections` is empty. Carries `links`, `quiz` and `notes`.
//! - **Composite**: `subsections` has one or more child ids. Its completion is
//!   derived from its children.
//!
//! # Examples
//!
//! ```rust
//! use curriculum_core::models::CurriculumNode;
//!
//! let section = CurriculumNode::new_section("New Section");
//! assert!(section.is_leaf());
//! assert!(!section.id.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Title given to sections created without an explicit title
pub const DEFAULT_SECTION_TITLE: &str = "New Section";

/// Reference to an external resource attached to a leaf
///
/// The resource itself lives in the backend; the outline only keeps its id and
/// whatever display metadata the host attached (name, type, url, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    /// Opaque resource identifier
    #[serde(default)]
    pub id: String,

    /// Display metadata, carried verbatim
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ResourceLink {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry, builder style
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// One entry of a curriculum outline
///
/// Node ids are unique across the whole forest and stable for the node's
/// lifetime. Fields the model does not know about are kept in `extra` so that
/// a load/save cycle never drops host data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumNode {
    /// Unique identifier (UUID v4 for nodes created here)
    pub id: String,

    /// Display title, may be empty
    #[serde(default)]
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Ordered child ids; empty means this node is a leaf
    #[serde(default)]
    pub subsections: Vec<String>,

    /// Linked resources (leaves only)
    #[serde(default)]
    pub links: Vec<ResourceLink>,

    /// Associated quiz id (leaves only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<String>,

    /// Author notes (leaves only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Unknown fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurriculumNode {
    /// Create a leaf with a freshly generated id
    pub fn new_section(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title)
    }

    /// Create a leaf with a caller-chosen id
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            subsections: Vec::new(),
            links: Vec::new(),
            quiz: None,
            notes: None,
            extra: Map::new(),
        }
    }

    /// Builder: set child ids
    pub fn with_subsections<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subsections = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.subsections.is_empty()
    }

    pub fn is_composite(&self) -> bool {
        !self.is_leaf()
    }

    /// Apply a partial update to the editable fields
    ///
    /// `subsections` is never touched here; structure only changes through the
    /// tree mutators.
    pub fn apply_update(&mut self, update: NodeUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(links) = update.links {
            self.links = links;
        }
        if let Some(quiz) = update.quiz {
            self.quiz = quiz;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

/// Partial update for a node's editable fields
///
/// Outer `None` leaves a field untouched. For the clearable fields (`quiz`,
/// `notes`) `Some(None)` removes the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ResourceLink>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_links(mut self, links: Vec<ResourceLink>) -> Self {
        self.links = Some(links);
        self
    }

    pub fn with_quiz(mut self, quiz: Option<String>) -> Self {
        self.quiz = Some(quiz);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// True if applying this update would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.links.is_none()
            && self.quiz.is_none()
            && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_section_is_leaf_with_fresh_id() {
        let a = CurriculumNode::new_section(DEFAULT_SECTION_TITLE);
        let b = CurriculumNode::new_section(DEFAULT_SECTION_TITLE);

        assert_eq!(a.title, "New Section");
        assert!(a.is_leaf());
        assert!(a.links.is_empty());
        assert!(a.quiz.is_none());
        assert!(a.notes.is_none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_composite_discriminator() {
        let node = CurriculumNode::with_id("s1", "Intro").with_subsections(["s1a", "s1b"]);
        assert!(node.is_composite());
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_deserialize_fills_defaults_and_keeps_unknown_fields() {
        let node: CurriculumNode = serde_json::from_value(json!({
            "id": "s1",
            "title": "Intro",
            "color": "blue"
        }))
        .unwrap();

        assert_eq!(node.description, "");
        assert!(node.subsections.is_empty());
        assert_eq!(node.extra.get("color"), Some(&json!("blue")));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["color"], json!("blue"));
        assert!(back.get("quiz").is_none());
    }

    #[test]
    fn test_resource_link_metadata_is_flattened() {
        let link = ResourceLink::new("asset-9").with("name", json!("Lecture 1"));
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value, json!({"id": "asset-9", "name": "Lecture 1"}));
    }

    #[test]
    fn test_apply_update_clears_quiz_and_keeps_structure() {
        let mut node = CurriculumNode::with_id("leaf", "Old").with_subsections(Vec::<String>::new());
        node.quiz = Some("quiz-1".to_string());

        node.apply_update(
            NodeUpdate::new()
                .with_title("New")
                .with_quiz(None)
                .with_notes(Some("read chapter 2".to_string())),
        );

        assert_eq!(node.title, "New");
        assert!(node.quiz.is_none());
        assert_eq!(node.notes.as_deref(), Some("read chapter 2"));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_empty_update() {
        assert!(NodeUpdate::new().is_empty());
        assert!(!NodeUpdate::new().with_description("x").is_empty());
    }
}
