//! Usage: Apply/delete named presets on top of a [`PresetStore`].

use crate::infra::presets::{PresetStore, Presets};
use crate::shared::error::AppResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetApplyResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<T>,
}

/// Writes preset `name` as the active config through `save_active`.
///
/// Unknown name or a failed write -> `success: false` without a config.
pub(crate) fn apply<T, S>(store: &PresetStore<T>, name: &str, save_active: S) -> PresetApplyResult<T>
where
    T: Serialize + DeserializeOwned + Clone,
    S: FnOnce(&T) -> AppResult<()>,
{
    let presets = store.load();
    let Some(config) = presets.get(name) else {
        tracing::debug!(preset = name, "apply: preset not found");
        return PresetApplyResult {
            success: false,
            config: None,
        };
    };

    match save_active(config) {
        Ok(()) => {
            tracing::info!(preset = name, "preset applied");
            PresetApplyResult {
                success: true,
                config: Some(config.clone()),
            }
        }
        Err(err) => {
            tracing::warn!(preset = name, "failed to apply preset: {}", err);
            PresetApplyResult {
                success: false,
                config: None,
            }
        }
    }
}

/// `false` when `name` is absent or the store could not be written.
pub(crate) fn delete<T>(store: &PresetStore<T>, name: &str) -> bool
where
    T: Serialize + DeserializeOwned,
{
    let mut presets: Presets<T> = store.load();
    if presets.remove(name).is_none() {
        return false;
    }
    match store.save(&presets) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(preset = name, "failed to delete preset: {}", err);
            false
        }
    }
}
