//! Configuration for the editor host
//!
//! Reads config from ~/.config/rich-editor/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::state::{EditorState, DEFAULT_LINE_HEIGHT};

/// Initial editor state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    pub line_height: i64,
    pub editable: bool,
    pub placeholder: String,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            editable: true,
            placeholder: String::new(),
        }
    }
}

/// Script bridge settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    /// Deadline for request/response calls; unset waits indefinitely
    pub call_timeout_ms: Option<u64>,
}

/// Local resource scheme settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourceSection {
    pub scheme: String,
    pub root: PathBuf,
    pub jpeg_quality: u8,
}

impl Default for ResourceSection {
    fn default() -> Self {
        Self {
            scheme: "re-resource".to_string(),
            root: PathBuf::from("."),
            jpeg_quality: 90,
        }
    }
}

/// Full editor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub editor: EditorSection,
    pub bridge: BridgeSection,
    pub resources: ResourceSection,
}

impl EditorConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        let config_path = Self::default_config_path();
        match Self::load_from_path(&config_path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "Ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rich-editor")
            .join("config.toml")
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Create default config file if it doesn't exist
    pub fn create_default_if_missing() {
        let path = Self::default_config_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let default_config = r#"# rich-editor Configuration

[editor]
line_height = 28
editable = true
placeholder = ""

[bridge]
# call_timeout_ms = 5000

[resources]
scheme = "re-resource"
root = "."
jpeg_quality = 90
"#;
            if let Err(e) = std::fs::write(&path, default_config) {
                tracing::warn!(path = %path.display(), error = %e, "Could not write default config");
            }
        }
    }

    /// State the editor starts from before the runtime is ready
    pub fn initial_state(&self) -> EditorState {
        EditorState {
            line_height: self.editor.line_height,
            is_editable: self.editor.editable,
            placeholder: self.editor.placeholder.clone(),
            ..EditorState::default()
        }
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.bridge.call_timeout_ms.map(Duration::from_millis)
    }
}
