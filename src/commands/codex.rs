//! Usage: Codex CLI config/auth and preset commands.

use crate::app::AppState;
use crate::blocking;
use crate::domain::presets::{self, PresetApplyResult};
use crate::infra::codex_config::{CodexAuth, CodexConfig};
use crate::infra::presets::Presets;
use crate::shared::error::AppError;

pub(crate) async fn codex_config_load(state: &AppState) -> Result<CodexConfig, String> {
    let files = state.codex.clone();
    blocking::run("codex_config_load", move || Ok::<_, String>(files.load_config())).await
}

/// Returns the config as written (legacy provider fields folded in).
pub(crate) async fn codex_config_save(
    state: &AppState,
    config: CodexConfig,
) -> Result<CodexConfig, String> {
    let files = state.codex.clone();
    blocking::run("codex_config_save", move || files.save_config(config)).await
}

pub(crate) async fn codex_config_raw(state: &AppState) -> Result<String, String> {
    let files = state.codex.clone();
    blocking::run("codex_config_raw", move || files.config_raw()).await
}

pub(crate) async fn codex_config_path(state: &AppState) -> Result<String, String> {
    Ok(state.codex.config_path().display().to_string())
}

pub(crate) async fn codex_auth_load(state: &AppState) -> Result<CodexAuth, String> {
    let files = state.codex.clone();
    blocking::run("codex_auth_load", move || Ok::<_, String>(files.load_auth())).await
}

pub(crate) async fn codex_auth_save(state: &AppState, auth: CodexAuth) -> Result<bool, String> {
    let files = state.codex.clone();
    blocking::run("codex_auth_save", move || {
        files.save_auth(&auth)?;
        Ok::<_, AppError>(true)
    })
    .await
}

pub(crate) async fn codex_auth_path(state: &AppState) -> Result<String, String> {
    Ok(state.codex.auth_path().display().to_string())
}

pub(crate) async fn codex_presets_load(state: &AppState) -> Result<Presets<CodexConfig>, String> {
    let store = state.codex_presets.clone();
    blocking::run("codex_presets_load", move || Ok::<_, String>(store.load())).await
}

pub(crate) async fn codex_presets_save(
    state: &AppState,
    presets: Presets<CodexConfig>,
) -> Result<bool, String> {
    let store = state.codex_presets.clone();
    blocking::run("codex_presets_save", move || {
        store.save(&presets)?;
        Ok::<_, AppError>(true)
    })
    .await
}

pub(crate) async fn codex_presets_apply(
    state: &AppState,
    name: String,
) -> Result<PresetApplyResult<CodexConfig>, String> {
    let store = state.codex_presets.clone();
    let files = state.codex.clone();
    blocking::run("codex_presets_apply", move || {
        Ok::<_, String>(presets::apply(&store, &name, |config| {
            files.save_config(config.clone()).map(|_| ())
        }))
    })
    .await
}

pub(crate) async fn codex_presets_delete(state: &AppState, name: String) -> Result<bool, String> {
    let store = state.codex_presets.clone();
    blocking::run("codex_presets_delete", move || {
        Ok::<_, String>(presets::delete(&store, &name))
    })
    .await
}
