//! Snapshot persistence seam
//!
//! Saving is owned by the host (REST calls, debounce, retries). The editor
//! only hands a consistent [`CurriculumSnapshot`] to a [`SnapshotSink`] and
//! reports whether it was accepted.

use crate::models::CompletionState;
use crate::tree::Forest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A consistent copy of the editor state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSnapshot {
    /// Outline in the current document format
    pub forest: Forest,
    /// Learner progress
    pub completion: CompletionState,
    /// Number of changes applied since the editor was created
    pub revision: u64,
    pub taken_at: DateTime<Utc>,
}

/// Receiver of editor snapshots
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn persist(&self, snapshot: &CurriculumSnapshot) -> anyhow::Result<()>;
}

/// Sink that keeps every snapshot in memory, for tests and local development
#[derive(Default)]
pub struct InMemorySink {
    saved: Arc<Mutex<Vec<CurriculumSnapshot>>>,
    fail_next: AtomicBool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `persist` call fail once
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Snapshots persisted so far, oldest first
    pub fn saved(&self) -> Vec<CurriculumSnapshot> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }

    pub fn latest(&self) -> Option<CurriculumSnapshot> {
        self.saved().pop()
    }
}

#[async_trait]
impl SnapshotSink for InMemorySink {
    async fn persist(&self, snapshot: &CurriculumSnapshot) -> anyhow::Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("simulated save failure at revision {}", snapshot.revision);
        }

        let mut saved = self
            .saved
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire lock"))?;
        saved.push(snapshot.clone());
        Ok(())
    }
}
