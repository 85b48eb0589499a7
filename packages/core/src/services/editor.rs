//! Curriculum editor session
//!
//! `CurriculumEditor` is the single owner of one outline and one learner's
//! completion state. It gives hosts the ordering guarantee the pure mutators
//! rely on:
//!
//! - Every change is derived from the most recently applied state while the
//!   write lock is held, so two rapid edits can never both start from the same
//!   stale forest (last-applied-wins).
//! - The new state is swapped in whole. Readers (`snapshot`, `continue_path`,
//!   a save in flight) only ever observe a complete forest.
//! - A [`CurriculumEvent`] goes out on a broadcast channel before the lock is
//!   released, so subscribers see changes in the order they were applied.
//! - Checks only ever sit on leaves. Checking a composite is rejected, and a
//!   check on a leaf that gains a subsection is dropped.
//!
//! # Examples
//!
//! ```rust
//! use curriculum_core::{CurriculumConfig, CurriculumEditor, CompletionState, InsertLocation};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let editor = CurriculumEditor::from_document(
//!     json!({"value": [{"id": "s1", "title": "Intro", "subsections": [{"id": "s1a"}]}]}),
//!     CompletionState::default(),
//!     CurriculumConfig::default(),
//! )
//! .unwrap();
//!
//! let new_id = editor.insert_section(InsertLocation::Below, "s1a").await.unwrap();
//! editor.toggle_check("s1a").await.unwrap();
//! assert_eq!(
//!     editor.continue_path().await.unwrap(),
//!     Some(vec!["s1".to_string(), new_id])
//! );
//! # });
//! ```

use crate::config::CurriculumConfig;
use crate::error::{CurriculumError, Result};
use crate::models::{CompletionState, CurriculumNode, LearnerStage, NodeUpdate};
use crate::services::events::CurriculumEvent;
use crate::services::loader::load_document;
use crate::services::sink::{CurriculumSnapshot, SnapshotSink};
use crate::tree::{
    self, course_completion, get_continue_path, validate_forest, CourseProgress, Forest,
    InsertLocation, MoveDirection, ParentIndex,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Broadcast capacity; lagging receivers skip missed events rather than
/// blocking the editor
const EVENT_CHANNEL_CAPACITY: usize = 100;

struct EditorState {
    forest: Forest,
    /// Rebuilt together with `forest` on every structural change
    parents: ParentIndex,
    completion: CompletionState,
    revision: u64,
}

impl EditorState {
    /// Install `forest` as the current outline and bump the revision
    ///
    /// Learner checks are pruned against the new forest in the same step.
    fn swap_in(&mut self, forest: Forest) -> Result<u64> {
        let parents = ParentIndex::build(&forest)?;
        let pruned = self.completion.prune(&forest);
        if pruned > 0 {
            tracing::debug!("Pruned {} learner entries no longer attached to leaves", pruned);
        }
        self.forest = forest;
        self.parents = parents;
        self.revision += 1;
        Ok(self.revision)
    }
}

/// Serialized owner of one curriculum outline and its learner state
pub struct CurriculumEditor {
    state: Arc<RwLock<EditorState>>,
    config: CurriculumConfig,
    events: broadcast::Sender<CurriculumEvent>,
}

impl CurriculumEditor {
    /// Start a session on `forest`
    ///
    /// The forest is validated when `config.validate_on_load` is set; the
    /// parent index is always built, so duplicate parentage fails here either
    /// way.
    pub fn new(
        forest: Forest,
        mut completion: CompletionState,
        config: CurriculumConfig,
    ) -> Result<Self> {
        config.validate()?;
        if config.validate_on_load {
            validate_forest(&forest, &config)?;
        }
        let parents = ParentIndex::build(&forest)?;
        let pruned = completion.prune(&forest);
        if pruned > 0 {
            tracing::info!("Dropped {} stale learner entries on open", pruned);
        }
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            state: Arc::new(RwLock::new(EditorState {
                forest,
                parents,
                completion,
                revision: 0,
            })),
            config,
            events,
        })
    }

    /// Start a session from a persisted document of either shape
    pub fn from_document(
        document: Value,
        completion: CompletionState,
        config: CurriculumConfig,
    ) -> Result<Self> {
        let loaded = load_document(document, &config)?;
        if loaded.migrated {
            tracing::info!("Editor opened a legacy document; it will be saved in the current format");
        }
        Self::new(loaded.forest, completion, config)
    }

    pub fn config(&self) -> &CurriculumConfig {
        &self.config
    }

    /// Receive every change applied from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CurriculumEvent> {
        self.events.subscribe()
    }

    /// Apply a structural change derived from the latest forest
    ///
    /// `change` runs under the write lock. On error nothing is swapped in and
    /// no event is sent. Returns the new revision.
    pub async fn apply<F>(&self, change: F) -> Result<u64>
    where
        F: FnOnce(&Forest) -> Result<(Forest, CurriculumEvent)>,
    {
        self.apply_indexed(|forest, _| change(forest)).await
    }

    /// [`apply`](Self::apply), with the parent index of the latest forest
    async fn apply_indexed<F>(&self, change: F) -> Result<u64>
    where
        F: FnOnce(&Forest, &ParentIndex) -> Result<(Forest, CurriculumEvent)>,
    {
        let mut state = self.state.write().await;
        let (forest, event) = change(&state.forest, &state.parents)?;
        let revision = state.swap_in(forest)?;

        tracing::debug!("Applied {} at revision {}", event.event_type(), revision);
        let _ = self.events.send(event);
        Ok(revision)
    }

    /// Insert a new section titled per config; returns its id
    pub async fn insert_section(&self, location: InsertLocation, target_id: &str) -> Result<String> {
        let node = CurriculumNode::new_section(self.config.default_section_title.clone());
        let node_id = node.id.clone();
        let target = target_id.to_string();

        self.apply(|forest| {
            let next = tree::insert_node(forest, location, &target, node)?;
            let event = CurriculumEvent::NodeInserted {
                node_id: node_id.clone(),
                target_id: target.clone(),
                location,
            };
            Ok((next, event))
        })
        .await?;
        Ok(node_id)
    }

    /// Swap a section with its neighbour; boundary moves are no-ops
    ///
    /// The sibling list is found through the parent index, so callers only
    /// name the node.
    pub async fn move_section(&self, node_id: &str, direction: MoveDirection) -> Result<()> {
        self.apply_indexed(|forest, parents| {
            forest.get(node_id)?;
            let parent_id = parents.parent_of(node_id);
            let next = tree::move_section(forest, parent_id, node_id, direction)?;
            let event = CurriculumEvent::NodeMoved {
                node_id: node_id.to_string(),
                direction,
            };
            Ok((next, event))
        })
        .await?;
        Ok(())
    }

    /// Delete a section and its subtree; returns every removed id
    ///
    /// Checks, notes and intros for removed nodes are pruned in the same
    /// state swap.
    pub async fn delete_section(&self, node_id: &str) -> Result<Vec<String>> {
        let mut state = self.state.write().await;
        let removed = tree::mutators::collect_subtree(&state.forest.nodes, node_id);
        let forest = tree::delete_section(&state.forest, node_id)?;
        let revision = state.swap_in(forest)?;

        tracing::debug!("Applied node:deleted at revision {}", revision);
        let _ = self.events.send(CurriculumEvent::NodeDeleted {
            node_id: node_id.to_string(),
            removed: removed.clone(),
        });
        Ok(removed)
    }

    /// Edit a section's non-structural fields
    pub async fn update_node(&self, node_id: &str, update: NodeUpdate) -> Result<()> {
        if update.is_empty() {
            // still fail for unknown ids
            self.state.read().await.forest.get(node_id)?;
            return Ok(());
        }
        self.apply(|forest| {
            let next = tree::update_node(forest, node_id, update)?;
            let event = CurriculumEvent::NodeUpdated {
                node_id: node_id.to_string(),
            };
            Ok((next, event))
        })
        .await?;
        Ok(())
    }

    /// Replace the whole outline, e.g. after an external sync
    pub async fn replace_forest(&self, forest: Forest) -> Result<u64> {
        validate_forest(&forest, &self.config)?;
        self.apply(move |_| {
            let event = CurriculumEvent::ForestReplaced {
                node_count: forest.len(),
            };
            Ok((forest, event))
        })
        .await
    }

    /// Flip the learner's check on leaf `node_id`; returns the new state
    ///
    /// Composites cannot be checked; their completion is derived.
    pub async fn toggle_check(&self, node_id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.forest.get(node_id)?.is_composite() {
            return Err(CurriculumError::not_a_leaf(node_id));
        }
        let complete = state.completion.toggle_check(node_id);
        state.revision += 1;

        let _ = self.events.send(CurriculumEvent::CompletionChanged {
            node_id: node_id.to_string(),
            complete,
        });
        Ok(complete)
    }

    /// Set the host-managed coarse progress flag
    pub async fn set_stage(&self, stage: LearnerStage) {
        let mut state = self.state.write().await;
        if state.completion.stage == stage {
            return;
        }
        state.completion.stage = stage;
        state.revision += 1;
        let _ = self.events.send(CurriculumEvent::StageChanged { stage });
    }

    /// Next incomplete leaf for the learner, as a root-to-leaf path
    pub async fn continue_path(&self) -> Result<Option<Vec<String>>> {
        let state = self.state.read().await;
        get_continue_path(&state.completion.completion_set(), &state.forest)
    }

    /// Derived completion of any node
    pub async fn is_complete(&self, node_id: &str) -> Result<bool> {
        let state = self.state.read().await;
        let node = state.forest.get(node_id)?;
        tree::is_complete(node, &state.completion.completion_set(), &state.forest.nodes)
    }

    /// Leaf-level progress
    pub async fn progress(&self) -> CourseProgress {
        let state = self.state.read().await;
        course_completion(&state.forest.nodes, &state.completion.completion_set())
    }

    /// Parent of `node_id` from the maintained index
    pub async fn parent_of(&self, node_id: &str) -> Option<String> {
        let state = self.state.read().await;
        state.parents.parent_of(node_id).map(str::to_owned)
    }

    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    /// Consistent copy of the current state
    pub async fn snapshot(&self) -> CurriculumSnapshot {
        let state = self.state.read().await;
        CurriculumSnapshot {
            forest: state.forest.clone(),
            completion: state.completion.clone(),
            revision: state.revision,
            taken_at: Utc::now(),
        }
    }

    /// Hand the current snapshot to `sink`; returns the saved revision
    ///
    /// The lock is not held while the sink runs, so edits made during a slow
    /// save land in the next one.
    pub async fn save(&self, sink: &dyn SnapshotSink) -> Result<u64> {
        let snapshot = self.snapshot().await;
        let revision = snapshot.revision;

        sink.persist(&snapshot).await.map_err(|e| {
            tracing::warn!("Failed to save revision {}: {}", revision, e);
            CurriculumError::persistence(e.to_string())
        })?;

        tracing::info!("Saved curriculum revision {}", revision);
        let _ = self.events.send(CurriculumEvent::SnapshotSaved { revision });
        Ok(revision)
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;
