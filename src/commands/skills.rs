//! Usage: Skills IPC commands (scan, sync, create, delete, import, copy).

use crate::app::AppState;
use crate::blocking;
use crate::domain::skills::{
    Provider, SkillCreateInput, SkillOpResult, SkillScanResult, SyncTargets,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub(crate) async fn skills_scan(state: &AppState) -> Result<SkillScanResult, String> {
    let engine = state.skills.clone();
    blocking::run("skills_scan", move || Ok::<_, String>(engine.scan())).await
}

pub(crate) async fn skills_paths(state: &AppState) -> Result<BTreeMap<Provider, String>, String> {
    Ok(state.skills.paths())
}

pub(crate) async fn skills_sync(
    state: &AppState,
    targets: SyncTargets,
) -> Result<SkillOpResult, String> {
    let _write = state.skills_write.lock().await;
    let engine = state.skills.clone();
    blocking::run("skills_sync", move || Ok::<_, String>(engine.sync(&targets))).await
}

pub(crate) async fn skills_create(
    state: &AppState,
    input: SkillCreateInput,
) -> Result<SkillOpResult, String> {
    let _write = state.skills_write.lock().await;
    let engine = state.skills.clone();
    blocking::run("skills_create", move || Ok::<_, String>(engine.create(&input))).await
}

pub(crate) async fn skills_delete(state: &AppState, name: String) -> Result<SkillOpResult, String> {
    let _write = state.skills_write.lock().await;
    let engine = state.skills.clone();
    blocking::run("skills_delete", move || Ok::<_, String>(engine.delete(&name))).await
}

pub(crate) async fn skills_import(
    state: &AppState,
    source_path: PathBuf,
    target_providers: Vec<Provider>,
) -> Result<SkillOpResult, String> {
    let _write = state.skills_write.lock().await;
    let engine = state.skills.clone();
    blocking::run("skills_import", move || {
        Ok::<_, String>(engine.import_skill(&source_path, &target_providers))
    })
    .await
}

pub(crate) async fn skills_copy(
    state: &AppState,
    skill_names: Vec<String>,
    target_path: PathBuf,
) -> Result<SkillOpResult, String> {
    let _write = state.skills_write.lock().await;
    let engine = state.skills.clone();
    blocking::run("skills_copy", move || {
        Ok::<_, String>(engine.copy_skills(&skill_names, &target_path))
    })
    .await
}
