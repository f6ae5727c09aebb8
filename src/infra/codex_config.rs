//! Usage: Codex CLI `config.toml` / `auth.json` under `~/.codex`.
//!
//! Unknown keys are carried through `extra` tables so a load/save cycle never drops settings this
//! app does not model (mcp servers, profiles, features, ...).

use super::json_file;
use crate::shared::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_MODEL_PROVIDER: &str = "openai";
const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexConfig {
    #[serde(default)]
    pub model_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_reasoning_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_response_storage: Option<bool>,
    #[serde(flatten)]
    pub extra: toml::Table,
    #[serde(default)]
    pub model_providers: BTreeMap<String, CodexModelProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodexModelProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Default for CodexConfig {
    fn default() -> Self {
        let mut model_providers = BTreeMap::new();
        model_providers.insert(
            DEFAULT_MODEL_PROVIDER.to_string(),
            CodexModelProvider {
                base_url: Some(String::new()),
                ..CodexModelProvider::default()
            },
        );
        Self {
            model_provider: DEFAULT_MODEL_PROVIDER.to_string(),
            model: Some(DEFAULT_MODEL.to_string()),
            model_reasoning_effort: None,
            disable_response_storage: None,
            extra: toml::Table::new(),
            model_providers,
        }
    }
}

impl CodexConfig {
    /// Folds legacy provider fields into the current layout:
    /// `api_base` becomes `base_url` (unless already set) and a per-provider `model` is lifted to
    /// the top level when the active provider carries one and no top-level model exists.
    pub fn normalized(mut self) -> Self {
        if self.model.is_none() {
            let lifted = self
                .model_providers
                .get(&self.model_provider)
                .and_then(|p| p.extra.get("model"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            self.model = lifted;
        }

        for provider in self.model_providers.values_mut() {
            if let Some(legacy) = provider.extra.remove("api_base") {
                let has_base_url = provider.base_url.as_deref().is_some_and(|s| !s.is_empty());
                if !has_base_url {
                    if let Some(url) = legacy.as_str().filter(|s| !s.is_empty()) {
                        provider.base_url = Some(url.to_string());
                    }
                }
            }
            provider.extra.remove("model");
        }
        self
    }
}

pub type CodexAuth = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone)]
pub struct CodexFiles {
    config_path: PathBuf,
    auth_path: PathBuf,
}

impl CodexFiles {
    pub fn from_home(home: &Path) -> Self {
        let dir = home.join(".codex");
        Self {
            config_path: dir.join("config.toml"),
            auth_path: dir.join("auth.json"),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn auth_path(&self) -> &Path {
        &self.auth_path
    }

    /// Missing or malformed `config.toml` -> [`CodexConfig::default`].
    pub fn load_config(&self) -> CodexConfig {
        let text = match std::fs::read_to_string(&self.config_path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return CodexConfig::default()
            }
            Err(err) => {
                tracing::warn!(path = %self.config_path.display(), "failed to read codex config: {}", err);
                return CodexConfig::default();
            }
        };
        match toml::from_str::<CodexConfig>(&text) {
            Ok(config) => config.normalized(),
            Err(err) => {
                tracing::warn!(path = %self.config_path.display(), "failed to parse codex config: {}", err);
                CodexConfig::default()
            }
        }
    }

    pub fn save_config(&self, config: CodexConfig) -> AppResult<CodexConfig> {
        let config = config.normalized();
        // Through `toml::Value` so plain keys are emitted ahead of tables regardless of field order.
        let text = toml::Value::try_from(&config)
            .and_then(|value| toml::to_string(&value))
            .map_err(|e| AppError::Parse(format!("failed to serialize codex config: {e}")))?;
        json_file::write_text(&self.config_path, &text)?;
        tracing::info!(path = %self.config_path.display(), "codex config saved");
        Ok(config)
    }

    /// Raw `config.toml` text; empty when the file does not exist.
    pub fn config_raw(&self) -> AppResult<String> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(AppError::io("failed to read", &self.config_path, err)),
        }
    }

    pub fn load_auth(&self) -> CodexAuth {
        json_file::read_json_or_default(&self.auth_path, "codex auth")
    }

    pub fn save_auth(&self, auth: &CodexAuth) -> AppResult<()> {
        json_file::write_json_pretty(&self.auth_path, auth)?;
        tracing::info!(path = %self.auth_path.display(), keys = auth.len(), "codex auth saved");
        Ok(())
    }
}

pub fn presets_path(home: &Path) -> PathBuf {
    home.join(".codex_presets").join("presets.json")
}
