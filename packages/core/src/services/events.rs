//! Curriculum editor events
//!
//! The editor broadcasts one event per applied change on a tokio broadcast
//! channel, so views and autosave can react without polling.
//!
//! # Event Flow
//!
//! 1. `CurriculumEditor` derives a new state from the latest applied one
//! 2. The new state is swapped in under the write lock
//! 3. The event is sent before the lock is released, so events arrive in the
//!    order the changes were applied
//! 4. Subscribers receive it asynchronously; a lagging subscriber loses the
//!    oldest events, never the state

use crate::models::LearnerStage;
use crate::tree::{InsertLocation, MoveDirection};
use serde::{Deserialize, Serialize};

/// A change applied by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CurriculumEvent {
    /// A new section was inserted
    #[serde(rename = "node:inserted", rename_all = "camelCase")]
    NodeInserted {
        node_id: String,
        target_id: String,
        location: InsertLocation,
    },

    /// A section swapped places with a sibling
    #[serde(rename = "node:moved", rename_all = "camelCase")]
    NodeMoved {
        node_id: String,
        direction: MoveDirection,
    },

    /// A section and its subtree were removed
    #[serde(rename = "node:deleted", rename_all = "camelCase")]
    NodeDeleted {
        node_id: String,
        removed: Vec<String>,
    },

    /// A section's title/description/links/quiz/notes changed
    #[serde(rename = "node:updated", rename_all = "camelCase")]
    NodeUpdated { node_id: String },

    /// The whole forest was replaced (load, undo, external sync)
    #[serde(rename = "forest:replaced", rename_all = "camelCase")]
    ForestReplaced { node_count: usize },

    /// A learner check was added or removed
    #[serde(rename = "completion:changed", rename_all = "camelCase")]
    CompletionChanged { node_id: String, complete: bool },

    /// The host-managed learner stage changed
    #[serde(rename = "completion:stage", rename_all = "camelCase")]
    StageChanged { stage: LearnerStage },

    /// A snapshot was handed to the sink successfully
    #[serde(rename = "snapshot:saved", rename_all = "camelCase")]
    SnapshotSaved { revision: u64 },
}

impl CurriculumEvent {
    /// Wire name of the event type
    pub fn event_type(&self) -> &str {
        match self {
            CurriculumEvent::NodeInserted { .. } => "node:inserted",
            CurriculumEvent::NodeMoved { .. } => "node:moved",
            CurriculumEvent::NodeDeleted { .. } => "node:deleted",
            CurriculumEvent::NodeUpdated { .. } => "node:updated",
            CurriculumEvent::ForestReplaced { .. } => "forest:replaced",
            CurriculumEvent::CompletionChanged { .. } => "completion:changed",
            CurriculumEvent::StageChanged { .. } => "completion:stage",
            CurriculumEvent::SnapshotSaved { .. } => "snapshot:saved",
        }
    }

    /// True for events that change the outline structure or content
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            CurriculumEvent::CompletionChanged { .. }
                | CurriculumEvent::StageChanged { .. }
                | CurriculumEvent::SnapshotSaved { .. }
        )
    }
}
