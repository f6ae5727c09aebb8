//! Usage: Claude Code settings and preset commands.

use crate::app::AppState;
use crate::blocking;
use crate::domain::presets::{self, PresetApplyResult};
use crate::infra::claude_settings::ClaudeConfig;
use crate::infra::presets::Presets;
use crate::shared::error::AppError;

pub(crate) async fn claude_config_load(state: &AppState) -> Result<ClaudeConfig, String> {
    let file = state.claude_settings.clone();
    blocking::run("claude_config_load", move || Ok::<_, String>(file.load())).await
}

pub(crate) async fn claude_config_save(
    state: &AppState,
    config: ClaudeConfig,
) -> Result<bool, String> {
    let file = state.claude_settings.clone();
    blocking::run("claude_config_save", move || {
        file.save(&config)?;
        Ok::<_, AppError>(true)
    })
    .await
}

pub(crate) async fn claude_config_path(state: &AppState) -> Result<String, String> {
    Ok(state.claude_settings.path().display().to_string())
}

pub(crate) async fn claude_presets_load(
    state: &AppState,
) -> Result<Presets<ClaudeConfig>, String> {
    let store = state.claude_presets.clone();
    blocking::run("claude_presets_load", move || Ok::<_, String>(store.load())).await
}

pub(crate) async fn claude_presets_save(
    state: &AppState,
    presets: Presets<ClaudeConfig>,
) -> Result<bool, String> {
    let store = state.claude_presets.clone();
    blocking::run("claude_presets_save", move || {
        store.save(&presets)?;
        Ok::<_, AppError>(true)
    })
    .await
}

pub(crate) async fn claude_presets_apply(
    state: &AppState,
    name: String,
) -> Result<PresetApplyResult<ClaudeConfig>, String> {
    let store = state.claude_presets.clone();
    let file = state.claude_settings.clone();
    blocking::run("claude_presets_apply", move || {
        Ok::<_, String>(presets::apply(&store, &name, |config| file.save(config)))
    })
    .await
}

pub(crate) async fn claude_presets_delete(state: &AppState, name: String) -> Result<bool, String> {
    let store = state.claude_presets.clone();
    blocking::run("claude_presets_delete", move || {
        Ok::<_, String>(presets::delete(&store, &name))
    })
    .await
}
