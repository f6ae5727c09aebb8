//! Usage: Tool installer commands. Progress is pushed through the state's `ProgressSink`.

use crate::app::AppState;
use crate::domain::installer::ToolInstallInfo;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub(crate) async fn installer_check_tool(
    state: &AppState,
    tool_id: String,
) -> Result<ToolInstallInfo, String> {
    Ok(state.installer.check_tool(&tool_id).await)
}

pub(crate) async fn installer_check_all(
    state: &AppState,
) -> Result<BTreeMap<String, ToolInstallInfo>, String> {
    Ok(state.installer.check_all_tools().await)
}

pub(crate) async fn installer_download(state: &AppState, tool_id: String) -> Result<String, String> {
    let path = state.installer.download_tool(&tool_id).await?;
    Ok(path.display().to_string())
}

pub(crate) async fn installer_install(
    state: &AppState,
    tool_id: String,
    installer_path: Option<PathBuf>,
) -> Result<bool, String> {
    Ok(state
        .installer
        .install_tool(&tool_id, installer_path.as_deref())
        .await?)
}

pub(crate) async fn installer_verify(state: &AppState, tool_id: String) -> Result<bool, String> {
    Ok(state.installer.verify_installation(&tool_id).await)
}

pub(crate) async fn installer_cancel(state: &AppState, tool_id: String) -> Result<(), String> {
    state.installer.cancel_installation(&tool_id);
    Ok(())
}
