//! Data Models
//!
//! This module contains the plain data carried by the curriculum model:
//!
//! - `CurriculumNode` - one outline entry (leaf or composite)
//! - `NodeUpdate` - partial edit of a node's non-structural fields
//! - `CompletionState` - one learner's checks, notes and stage
//! - `StoredDocument` - current and legacy persisted document shapes

mod completion;
mod document;
mod node;

pub use completion::{CompletionState, LearnerStage};
pub use document::{LegacyDocument, NestedNodeRecord, StoredDocument};
pub use node::{CurriculumNode, NodeUpdate, ResourceLink, DEFAULT_SECTION_TITLE};
