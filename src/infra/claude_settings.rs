//! Usage: Claude Code `settings.json` (read fail-open, unknown keys preserved).

use super::json_file;
use crate::shared::error::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaudeConfig {
    #[serde(default)]
    pub env: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub include_co_authored_by: bool,
    #[serde(default)]
    pub permissions: ClaudePermissions,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaudePermissions {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ClaudeSettingsFile {
    path: PathBuf,
}

impl ClaudeSettingsFile {
    pub fn from_home(home: &Path) -> Self {
        Self {
            path: home.join(".claude").join("settings.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ClaudeConfig {
        json_file::read_json_or_default(&self.path, "claude settings")
    }

    pub fn save(&self, config: &ClaudeConfig) -> AppResult<()> {
        json_file::write_json_pretty(&self.path, config)?;
        tracing::info!(path = %self.path.display(), "claude settings saved");
        Ok(())
    }
}

pub fn presets_path(home: &Path) -> PathBuf {
    home.join(".claude_presets").join("presets.json")
}

#[cfg(test)]
mod tests;
