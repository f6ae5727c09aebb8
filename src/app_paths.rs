//! Usage: Resolve the user's home directory and this app's dotdir layout.

use crate::shared::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

pub const APP_DOTDIR_NAME: &str = ".claude-config";
pub const HOME_OVERRIDE_ENV: &str = "CLAUDE_CONFIG_HUB_HOME";

#[derive(Debug, Clone)]
pub struct AppPaths {
    home_dir: PathBuf,
    app_dir: PathBuf,
}

impl AppPaths {
    /// `$CLAUDE_CONFIG_HUB_HOME` wins over the OS home dir.
    pub fn resolve() -> AppResult<Self> {
        if let Some(home) = std::env::var_os(HOME_OVERRIDE_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::from_home(PathBuf::from(home)));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::NotFound("failed to resolve home dir".to_string()))?;
        Ok(Self::from_home(home))
    }

    pub fn from_home(home_dir: PathBuf) -> Self {
        let app_dir = home_dir.join(APP_DOTDIR_NAME);
        Self { home_dir, app_dir }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.app_dir.join("cache")
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.app_dir.join("tools")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.app_dir.join("logs")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.app_dir.join("settings.json")
    }

    pub fn ensure_app_dir(&self) -> AppResult<&Path> {
        std::fs::create_dir_all(&self.app_dir)
            .map_err(|e| AppError::io("failed to create app dir", &self.app_dir, e))?;
        Ok(&self.app_dir)
    }
}
