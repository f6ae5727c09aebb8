//! Usage: Union view of every provider's skills directory.

use super::engine::SkillsEngine;
use super::fs_ops::SkillFs;
use super::skill_md::{extract_description, DEFAULT_DESCRIPTION, MANIFEST_FILE};
use super::types::{Provider, Skill, SkillScanResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

impl<F: SkillFs> SkillsEngine<F> {
    /// Enumerate all providers. A provider whose root is missing or cannot be
    /// read contributes an empty list; the scan itself never fails.
    pub fn scan(&self) -> SkillScanResult {
        let mut providers = BTreeMap::new();
        let mut names = BTreeSet::new();

        for (provider, root) in self.roots.iter() {
            let skills = self.scan_provider(provider, root);
            names.extend(skills.iter().map(|s| s.name.clone()));
            providers.insert(provider, skills);
        }

        tracing::debug!(total = names.len(), "skills scan complete");
        SkillScanResult {
            providers,
            all_skills: names.into_iter().collect(),
            paths: self.paths(),
        }
    }

    fn scan_provider(&self, provider: Provider, root: &Path) -> Vec<Skill> {
        if !self.fs.exists(root) {
            tracing::debug!(%provider, root = %root.display(), "skills root does not exist");
            return Vec::new();
        }

        let dirs = match self.skill_dirs(root) {
            Ok(dirs) => dirs,
            Err(err) => {
                tracing::warn!(%provider, "failed to scan skills: {}", err);
                return Vec::new();
            }
        };

        dirs.into_iter()
            .map(|(name, dir)| Skill {
                description: self.read_description(&dir),
                path: dir.to_string_lossy().to_string(),
                name,
                provider,
            })
            .collect()
    }

    fn read_description(&self, dir: &Path) -> String {
        self.fs
            .read_to_string(&dir.join(MANIFEST_FILE))
            .ok()
            .and_then(|text| extract_description(&text))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
    }
}
