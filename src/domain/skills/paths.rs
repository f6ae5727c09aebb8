use super::types::Provider;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Provider -> skills root table. Built once and handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRoots {
    roots: [PathBuf; 5],
}

impl ProviderRoots {
    /// Well-known locations under a home directory.
    pub fn from_home(home: &Path) -> Self {
        Self {
            roots: [
                home.join(".claude").join("skills"),
                home.join(".codex").join("skills"),
                home.join(".gemini").join("skills"),
                home.join(".gemini").join("antigravity").join("skills"),
                home.join(".trae").join("skills"),
            ],
        }
    }

    pub fn with_root(mut self, provider: Provider, root: PathBuf) -> Self {
        self.roots[provider.index()] = root;
        self
    }

    pub fn root(&self, provider: Provider) -> &Path {
        &self.roots[provider.index()]
    }

    /// Roots in provider declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Provider, &Path)> + '_ {
        Provider::ALL.into_iter().map(move |p| (p, self.root(p)))
    }

    pub fn to_display_map(&self) -> BTreeMap<Provider, String> {
        self.iter()
            .map(|(p, root)| (p, root.to_string_lossy().to_string()))
            .collect()
    }
}
