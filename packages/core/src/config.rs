//! Curriculum model configuration
//!
//! Stored as JSON. Every field has a serde default, so older or partial files
//! deserialize without error and a missing file simply means defaults.
//!
//! # Environment Variable
//! * `CURRICULUM_CONFIG_PATH` - location of the config file read by
//!   [`CurriculumConfig::from_env`]

use crate::error::{CurriculumError, Result};
use crate::models::DEFAULT_SECTION_TITLE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CURRICULUM_CONFIG_PATH";

/// Upper bound accepted for `max_depth`; deeper recursion risks the stack
const MAX_SUPPORTED_DEPTH: usize = 1024;

/// Settings for loading and editing curriculum outlines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumConfig {
    /// Title for sections created by insert
    #[serde(default = "default_section_title")]
    pub default_section_title: String,

    /// Run the forest validator when a document is loaded
    #[serde(default = "default_validate_on_load")]
    pub validate_on_load: bool,

    /// Deepest nesting accepted on load (roots are depth 1)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Largest node store accepted on load
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

fn default_section_title() -> String {
    DEFAULT_SECTION_TITLE.to_string()
}

fn default_validate_on_load() -> bool {
    true
}

fn default_max_depth() -> usize {
    64
}

fn default_max_nodes() -> usize {
    10_000
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            default_section_title: default_section_title(),
            validate_on_load: default_validate_on_load(),
            max_depth: default_max_depth(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl CurriculumConfig {
    /// Load config from a JSON file
    ///
    /// # Returns
    /// * `Ok(CurriculumConfig)` - parsed config, or defaults if the file doesn't exist
    /// * `Err(CurriculumError::InvalidConfig)` - unreadable, unparsable or invalid file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await.map_err(|e| {
            CurriculumError::invalid_config(format!("Failed to read {:?}: {}", path, e))
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            CurriculumError::invalid_config(format!("Failed to parse {:?}: {}", path, e))
        })?;
        config.validate()?;

        tracing::info!("Loaded curriculum config from {:?}", path);
        Ok(config)
    }

    /// Load config from `CURRICULUM_CONFIG_PATH`, or defaults when unset
    pub async fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path).await,
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CurriculumError::invalid_config(
                "maxDepth must be greater than 0",
            ));
        }

        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(CurriculumError::invalid_config(format!(
                "maxDepth cannot exceed {}",
                MAX_SUPPORTED_DEPTH
            )));
        }

        if self.max_nodes == 0 {
            return Err(CurriculumError::invalid_config(
                "maxNodes must be greater than 0",
            ));
        }

        Ok(())
    }
}
