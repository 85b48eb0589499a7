//! Curriculum Document Checker
//!
//! Loads a persisted curriculum document (current or legacy format), runs the
//! structural checks and reports the learner's progress.
//!
//! # Usage
//!
//! ```bash
//! # Check an outline
//! cargo run --bin curriculum-check -- course.json
//!
//! # Also report progress for a learner's completion state
//! cargo run --bin curriculum-check -- course.json progress.json
//! ```
//!
//! # Environment Variables
//!
//! - `CURRICULUM_CONFIG_PATH`: Config file (default: built-in defaults)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use curriculum_core::{
    course_completion, get_continue_path, load_document, CompletionState, CurriculumConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let document_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: curriculum-check <document.json> [completion.json]")?;
    let completion_path = args.next().map(PathBuf::from);

    let config = CurriculumConfig::from_env().await?;

    let raw = tokio::fs::read_to_string(&document_path)
        .await
        .with_context(|| format!("Failed to read {:?}", document_path))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{:?} is not valid JSON", document_path))?;

    let loaded = load_document(value, &config)?;
    tracing::info!(
        "{:?}: {} node(s), {} root(s), {} leaf section(s)",
        document_path,
        loaded.forest.len(),
        loaded.forest.roots.len(),
        loaded.forest.leaves().count()
    );
    if loaded.migrated {
        tracing::info!("Document uses the legacy nested format");
    }

    let completion = match completion_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {:?}", path))?;
            serde_json::from_str::<CompletionState>(&raw)
                .with_context(|| format!("{:?} is not a completion state", path))?
        }
        None => CompletionState::default(),
    };

    let checked = completion.completion_set();
    let progress = course_completion(&loaded.forest.nodes, &checked);
    tracing::info!(
        "Progress: {}/{} leaves ({:.0}%)",
        progress.completed_leaves,
        progress.total_leaves,
        progress.fraction() * 100.0
    );

    match get_continue_path(&checked, &loaded.forest)? {
        Some(path) => {
            let titles: Vec<&str> = path
                .iter()
                .filter_map(|id| loaded.forest.get(id).ok())
                .map(|node| node.title.as_str())
                .collect();
            tracing::info!("Continue at: {}", titles.join(" > "));
        }
        None => tracing::info!("Course finished"),
    }

    Ok(())
}
