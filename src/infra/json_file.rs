//! Usage: Read/write pretty JSON files owned by the CLIs (missing file -> caller default).

use crate::shared::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// `Ok(None)` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<Option<T>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(AppError::io("failed to read", path, err)),
    };
    let value = serde_json::from_str(&text)
        .map_err(|e| AppError::Parse(format!("{}: {e}", path.display())))?;
    Ok(Some(value))
}

/// Missing or unreadable files fall back to `T::default()`.
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path, what: &str) -> T {
    match read_json(path) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to load {what}: {}", err);
            T::default()
        }
    }
}

pub(crate) fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Parse(format!("failed to serialize {}: {e}", path.display())))?;
    write_text(path, &json)
}

pub(crate) fn write_text(path: &Path, text: &str) -> AppResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| AppError::io("failed to create", dir, e))?;
    }
    std::fs::write(path, text).map_err(|e| AppError::io("failed to write", path, e))
}
