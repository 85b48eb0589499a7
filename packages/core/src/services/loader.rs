//! Document loading
//!
//! Turns persisted JSON into a [`Forest`], migrating the legacy nested format
//! exactly once and validating the result when the config asks for it.

use crate::config::CurriculumConfig;
use crate::error::Result;
use crate::models::StoredDocument;
use crate::tree::{extract_nodes, validate_forest, Forest};
use serde_json::Value;

/// What [`load_document`] did to produce the forest
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub forest: Forest,
    /// True when the input was in the legacy nested format
    pub migrated: bool,
}

/// Decode a persisted document of either shape into a forest
pub fn load_document(value: Value, config: &CurriculumConfig) -> Result<LoadedDocument> {
    let (forest, migrated) = match StoredDocument::from_value(value)? {
        StoredDocument::Current(forest) => (forest, false),
        StoredDocument::Legacy(legacy) => (extract_nodes(legacy.value)?, true),
    };

    if config.validate_on_load {
        validate_forest(&forest, config)?;
    }

    tracing::debug!(
        "Loaded curriculum: {} node(s), {} root(s), migrated={}",
        forest.len(),
        forest.roots.len(),
        migrated
    );
    Ok(LoadedDocument { forest, migrated })
}

/// [`load_document`] from a JSON string
pub fn load_document_str(json: &str, config: &CurriculumConfig) -> Result<LoadedDocument> {
    load_document(serde_json::from_str(json)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurriculumError;
    use serde_json::json;

    #[test]
    fn test_load_current_document() {
        let loaded = load_document(
            json!({
                "roots": ["s1"],
                "nodes": {
                    "s1": {"id": "s1", "title": "Intro", "subsections": ["s1a"]},
                    "s1a": {"id": "s1a", "title": "Part A"}
                }
            }),
            &CurriculumConfig::default(),
        )
        .unwrap();

        assert!(!loaded.migrated);
        assert_eq!(loaded.forest.len(), 2);
    }

    #[test]
    fn test_load_migrates_legacy_document() {
        let loaded = load_document(
            json!({"value": [{"id": "s1", "subsections": [{"id": "s1a"}]}]}),
            &CurriculumConfig::default(),
        )
        .unwrap();

        assert!(loaded.migrated);
        assert_eq!(loaded.forest.roots, vec!["s1"]);
        assert_eq!(loaded.forest.get("s1").unwrap().subsections, vec!["s1a"]);
    }

    #[test]
    fn test_load_rejects_broken_forest() {
        let broken = json!({
            "roots": ["s1"],
            "nodes": {"s1": {"id": "s1", "subsections": ["ghost"]}}
        });
        let err = load_document(broken.clone(), &CurriculumConfig::default()).unwrap_err();
        assert!(err.is_structural());

        // validation can be switched off
        let config = CurriculumConfig {
            validate_on_load: false,
            ..Default::default()
        };
        assert!(load_document(broken, &config).is_ok());
    }

    #[test]
    fn test_load_invalid_json_string() {
        let err = load_document_str("{not json", &CurriculumConfig::default()).unwrap_err();
        assert!(matches!(err, CurriculumError::Serialization(_)));
    }
}
