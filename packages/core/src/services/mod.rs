//! Editor Services
//!
//! Stateful layer on top of the pure tree model:
//!
//! - `CurriculumEditor` - serialized owner of one outline and its learner state
//! - `CurriculumEvent` - broadcast notification for every applied change
//! - `load_document` - decode either persisted shape into a validated forest
//! - `SnapshotSink` - host-provided persistence of editor snapshots
//!
//! Services keep the tree functions pure; ordering, notification and saving
//! all live here.

pub mod editor;
pub mod events;
pub mod loader;
pub mod sink;

pub use editor::CurriculumEditor;
pub use events::CurriculumEvent;
pub use loader::{load_document, load_document_str, LoadedDocument};
pub use sink::{CurriculumSnapshot, InMemorySink, SnapshotSink};
