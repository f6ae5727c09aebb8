//! Usage: App settings commands.

use crate::app::AppState;
use crate::{blocking, settings};

pub(crate) async fn settings_get(state: &AppState) -> Result<settings::AppSettings, String> {
    let paths = state.paths.clone();
    blocking::run("settings_get", move || settings::read(&paths)).await
}

/// Timeouts take effect on next launch; log retention on the next cleanup pass.
pub(crate) async fn settings_set(
    state: &AppState,
    next: settings::AppSettings,
) -> Result<settings::AppSettings, String> {
    let paths = state.paths.clone();
    blocking::run("settings_set", move || settings::write(&paths, next)).await
}
