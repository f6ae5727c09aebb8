//! Usage: App settings persisted as JSON under the app dotdir (read fail-open).

use crate::app_paths::AppPaths;
use crate::shared::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 7;
pub const DEFAULT_DOWNLOAD_CONNECT_TIMEOUT_SECONDS: u32 = 60;
pub const DEFAULT_DOWNLOAD_TOTAL_TIMEOUT_SECONDS: u32 = 300;
pub const DEFAULT_INSTALL_COMMAND_TIMEOUT_SECONDS: u32 = 300;
pub const DEFAULT_VERIFY_COMMAND_TIMEOUT_SECONDS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub log_retention_days: u32,
    pub download_connect_timeout_seconds: u32,
    pub download_total_timeout_seconds: u32,
    pub install_command_timeout_seconds: u32,
    pub verify_command_timeout_seconds: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
            download_connect_timeout_seconds: DEFAULT_DOWNLOAD_CONNECT_TIMEOUT_SECONDS,
            download_total_timeout_seconds: DEFAULT_DOWNLOAD_TOTAL_TIMEOUT_SECONDS,
            install_command_timeout_seconds: DEFAULT_INSTALL_COMMAND_TIMEOUT_SECONDS,
            verify_command_timeout_seconds: DEFAULT_VERIFY_COMMAND_TIMEOUT_SECONDS,
        }
    }
}

impl AppSettings {
    /// Zero values would disable timeouts or retention entirely; clamp to 1.
    fn sanitized(mut self) -> Self {
        self.log_retention_days = self.log_retention_days.max(1);
        self.download_connect_timeout_seconds = self.download_connect_timeout_seconds.max(1);
        self.download_total_timeout_seconds = self.download_total_timeout_seconds.max(1);
        self.install_command_timeout_seconds = self.install_command_timeout_seconds.max(1);
        self.verify_command_timeout_seconds = self.verify_command_timeout_seconds.max(1);
        self
    }
}

pub fn read(paths: &AppPaths) -> AppResult<AppSettings> {
    let path = paths.settings_path();
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(&path)
        .map_err(|e| AppError::io("failed to read settings", &path, e))?;
    let settings: AppSettings = serde_json::from_str(&text)
        .map_err(|e| AppError::Parse(format!("{}: {e}", path.display())))?;
    Ok(settings.sanitized())
}

/// Never fails: a broken settings file must not block startup.
pub fn read_fail_open(paths: &AppPaths) -> AppSettings {
    match read(paths) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("settings read failed, using defaults: {}", err);
            AppSettings::default()
        }
    }
}

pub fn write(paths: &AppPaths, settings: AppSettings) -> AppResult<AppSettings> {
    let settings = settings.sanitized();
    paths.ensure_app_dir()?;
    let path = paths.settings_path();
    let json = serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::Parse(format!("failed to serialize settings: {e}")))?;
    std::fs::write(&path, json).map_err(|e| AppError::io("failed to write settings", &path, e))?;
    tracing::info!(path = %path.display(), "settings saved");
    Ok(settings)
}
