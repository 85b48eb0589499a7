//! Learner completion state
//!
//! Persisted per learner as
//! `{ notes: {id: text}, checks: [id], stage: 0|1|2, intros: {id: text} }`.
//! `checks` is the completion set consumed by the traversal engine. `stage` is a
//! coarse flag set by the host; nothing in this crate derives it.

use crate::tree::Forest;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Coarse learner progress flag, stored as an integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LearnerStage {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

impl TryFrom<u8> for LearnerStage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotStarted),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Finished),
            other => Err(format!("invalid learner stage {}", other)),
        }
    }
}

impl From<LearnerStage> for u8 {
    fn from(stage: LearnerStage) -> Self {
        match stage {
            LearnerStage::NotStarted => 0,
            LearnerStage::InProgress => 1,
            LearnerStage::Finished => 2,
        }
    }
}

/// One learner's progress through a curriculum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionState {
    /// Learner notes keyed by node id
    #[serde(default)]
    pub notes: HashMap<String, String>,

    /// Node ids the learner marked complete, in the order they were checked
    #[serde(default)]
    pub checks: Vec<String>,

    #[serde(default)]
    pub stage: LearnerStage,

    /// Generated section introductions keyed by node id
    #[serde(default)]
    pub intros: HashMap<String, String>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state whose checks are exactly `ids`
    pub fn with_checks<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for id in ids {
            state.mark_complete(id);
        }
        state
    }

    /// The completion set as a lookup structure
    pub fn completion_set(&self) -> HashSet<String> {
        self.checks.iter().cloned().collect()
    }

    pub fn is_checked(&self, node_id: &str) -> bool {
        self.checks.iter().any(|id| id == node_id)
    }

    /// Add `node_id` to the checks; returns false if it was already there
    pub fn mark_complete(&mut self, node_id: impl Into<String>) -> bool {
        let node_id = node_id.into();
        if self.is_checked(&node_id) {
            return false;
        }
        self.checks.push(node_id);
        true
    }

    /// Remove `node_id` from the checks; returns false if it was not there
    pub fn unmark(&mut self, node_id: &str) -> bool {
        let before = self.checks.len();
        self.checks.retain(|id| id != node_id);
        self.checks.len() != before
    }

    /// Flip the check for `node_id`, returning the new state
    pub fn toggle_check(&mut self, node_id: &str) -> bool {
        if self.unmark(node_id) {
            false
        } else {
            self.checks.push(node_id.to_string());
            true
        }
    }

    /// Drop notes and intros for nodes no longer in `forest`, and checks on
    /// anything that is not a leaf of `forest`
    ///
    /// A check left on a composite would complete it the moment its last child
    /// is deleted. Returns how many entries were removed.
    pub fn prune(&mut self, forest: &Forest) -> usize {
        let before = self.checks.len() + self.notes.len() + self.intros.len();
        self.checks
            .retain(|id| forest.get(id).map(|node| node.is_leaf()).unwrap_or(false));
        self.notes.retain(|id, _| forest.contains(id));
        self.intros.retain(|id, _| forest.contains(id));
        before - (self.checks.len() + self.notes.len() + self.intros.len())
    }
}
