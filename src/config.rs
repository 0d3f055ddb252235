//! Editor configuration.
//!
//! Every field has a default, so a partial (or empty) JSON file is a valid configuration.

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for one editing session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo entries
    pub history_depth: usize,
    /// Offset used for pastes without an anchor or viewport
    pub paste_offset: f32,
    /// Minimum centre travel (world units) before drag guides are recomputed
    pub guide_move_threshold: f32,
    /// Distance within which two edges or centres count as aligned
    pub guide_snap_tolerance: f32,
    /// Grid cell size used when snapping drags to the grid
    pub grid_size: f32,
    /// Remote execution settings
    pub bridge: BridgeConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: MAX_UNDO_HISTORY,
            paste_offset: PASTE_OFFSET,
            guide_move_threshold: GUIDE_MOVE_THRESHOLD,
            guide_snap_tolerance: GUIDE_SNAP_TOLERANCE,
            grid_size: GRID_SIZE,
            bridge: BridgeConfig::default(),
        }
    }
}

/// Settings for the execution bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL of the workflow service; execution is unavailable when unset
    pub base_url: Option<String>,
    /// Name given to temporary workflows built from the canvas
    pub workflow_name: String,
    /// Description given to temporary workflows
    pub workflow_description: String,
    /// Input used when the canvas has no input node with a configured value
    pub fallback_input: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            workflow_name: "Canvas run".to_string(),
            workflow_description: "Temporary workflow built from the editor canvas".to_string(),
            fallback_input: "Hello".to_string(),
        }
    }
}

impl EditorConfig {
    /// Deserialize a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history_depth, 50);
        assert_eq!(config.paste_offset, 16.0);
        assert!(config.bridge.base_url.is_none());
    }

    #[test]
    fn test_partial_json_overrides_only_given_fields() {
        let config = EditorConfig::from_json(
            r#"{"history_depth": 10, "bridge": {"base_url": "http://localhost:8000"}}"#,
        )
        .unwrap();
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.grid_size, 20.0);
        assert_eq!(config.bridge.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.bridge.workflow_name, "Canvas run");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EditorConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
