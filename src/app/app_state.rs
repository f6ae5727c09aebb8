//! Usage: Long-lived application state shared by every IPC command.

use crate::app_paths::AppPaths;
use crate::domain::installer::{InstallerConfig, InstallerService, ProgressSink, ToolCatalog};
use crate::domain::skills::{ProviderRoots, SkillsEngine};
use crate::infra::claude_settings::{self, ClaudeConfig, ClaudeSettingsFile};
use crate::infra::codex_config::{self, CodexConfig, CodexFiles};
use crate::infra::presets::PresetStore;
use crate::settings;
use crate::shared::error::AppResult;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub(crate) paths: AppPaths,
    pub(crate) skills: Arc<SkillsEngine>,
    /// Held for the whole of sync/create/delete/import/copy; scan does not take it.
    pub(crate) skills_write: Arc<tokio::sync::Mutex<()>>,
    pub(crate) installer: Arc<InstallerService>,
    pub(crate) claude_settings: ClaudeSettingsFile,
    pub(crate) claude_presets: PresetStore<ClaudeConfig>,
    pub(crate) codex: CodexFiles,
    pub(crate) codex_presets: PresetStore<CodexConfig>,
}

impl AppState {
    /// Installer timeouts come from the settings file as read here; later edits apply on restart.
    pub fn new(paths: AppPaths, progress: Arc<dyn ProgressSink>) -> AppResult<Self> {
        let home = paths.home_dir().to_path_buf();
        let app_settings = settings::read_fail_open(&paths);

        let skills = SkillsEngine::new(ProviderRoots::from_home(&home));
        let installer = InstallerService::new(
            ToolCatalog::builtin(),
            InstallerConfig::from_settings(&paths, &app_settings),
            progress,
        )?;

        Ok(Self {
            skills: Arc::new(skills),
            skills_write: Arc::new(tokio::sync::Mutex::new(())),
            installer: Arc::new(installer),
            claude_settings: ClaudeSettingsFile::from_home(&home),
            claude_presets: PresetStore::new(claude_settings::presets_path(&home)),
            codex: CodexFiles::from_home(&home),
            codex_presets: PresetStore::new(codex_config::presets_path(&home)),
            paths,
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Creates missing provider skill roots; failures are logged only.
    pub fn prepare(&self) {
        self.skills.ensure_roots();
    }
}
