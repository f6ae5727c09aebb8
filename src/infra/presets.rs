//! Usage: Named config presets stored as one JSON object (`name -> config`).

use super::json_file;
use crate::shared::error::AppResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub type Presets<T> = BTreeMap<String, T>;

#[derive(Debug, Clone)]
pub struct PresetStore<T> {
    path: PathBuf,
    _config: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> PresetStore<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _config: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or malformed file -> no presets.
    pub fn load(&self) -> Presets<T> {
        json_file::read_json_or_default(&self.path, "presets")
    }

    pub fn save(&self, presets: &Presets<T>) -> AppResult<()> {
        json_file::write_json_pretty(&self.path, presets)?;
        tracing::info!(path = %self.path.display(), count = presets.len(), "presets saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
