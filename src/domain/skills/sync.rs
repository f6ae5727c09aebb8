//! Usage: Fill gaps so every target provider holds every known skill.

use super::engine::SkillsEngine;
use super::fs_ops::SkillFs;
use super::types::{SkillOpResult, SyncTargets};
use crate::shared::error::AppResult;
use std::collections::BTreeMap;
use std::path::PathBuf;

impl<F: SkillFs> SkillsEngine<F> {
    /// Copy missing skills into the target providers.
    ///
    /// A target directory that already holds a manifest is never touched.
    /// A same-named directory without a manifest is treated as incomplete
    /// and the source is copied into it. Copy errors abort the remaining
    /// work; copies already made stay on disk.
    pub fn sync(&self, targets: &SyncTargets) -> SkillOpResult {
        SkillOpResult::from_outcome("Sync", self.sync_inner(targets))
    }

    fn sync_inner(&self, targets: &SyncTargets) -> AppResult<String> {
        let sources = self.source_map();
        let targets = targets.resolve();
        tracing::info!(
            skills = sources.len(),
            targets = ?targets,
            "syncing skills"
        );

        let mut copied = 0usize;
        for target in &targets {
            let root = self.roots.root(*target);
            self.fs.ensure_dir(root)?;

            for (name, src) in &sources {
                let dst = root.join(name);
                if !self.fs.exists(&dst) {
                    tracing::info!(skill = %name, provider = %target, "copying skill");
                } else if !self.has_manifest(&dst) {
                    tracing::info!(skill = %name, provider = %target, "filling incomplete skill");
                } else {
                    continue;
                }
                self.fs.copy_tree(src, &dst)?;
                copied += 1;
            }
        }

        Ok(format!(
            "Synced skills. Checked {} skills across {} providers ({} copied).",
            sources.len(),
            targets.len(),
            copied
        ))
    }

    /// skill name -> source dir; the first provider in declaration order wins.
    pub(super) fn source_map(&self) -> BTreeMap<String, PathBuf> {
        let mut sources = BTreeMap::new();
        for (provider, root) in self.roots.iter() {
            let dirs = match self.skill_dirs(root) {
                Ok(dirs) => dirs,
                Err(err) => {
                    tracing::warn!(%provider, "skipping unreadable skills root: {}", err);
                    continue;
                }
            };
            for (name, dir) in dirs {
                sources.entry(name).or_insert(dir);
            }
        }
        sources
    }
}
