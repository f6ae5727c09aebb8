//! Usage: Create / delete / export skills across providers.

use super::engine::{validate_skill_name, SkillsEngine};
use super::fs_ops::SkillFs;
use super::skill_md::{render_template, MANIFEST_FILE};
use super::types::{dedup_providers, SkillCreateInput, SkillOpResult};
use crate::shared::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

impl<F: SkillFs> SkillsEngine<F> {
    /// Scaffold a skill in each requested provider. An existing manifest is
    /// left exactly as it is, so repeated calls are harmless.
    pub fn create(&self, input: &SkillCreateInput) -> SkillOpResult {
        SkillOpResult::from_outcome("Create skill", self.create_inner(input))
    }

    fn create_inner(&self, input: &SkillCreateInput) -> AppResult<String> {
        let name = validate_skill_name(&input.name)?;
        let providers = dedup_providers(&input.providers);
        if providers.is_empty() {
            return Err(AppError::invalid(
                "name and at least one provider are required",
            ));
        }

        tracing::info!(skill = %name, providers = ?providers, "creating skill");
        let manifest = render_template(&name, input.description.as_deref());

        for provider in &providers {
            let root = self.roots.root(*provider);
            self.fs.ensure_dir(root)?;

            let skill_dir = root.join(&name);
            if self.fs.exists(&skill_dir) {
                tracing::debug!(skill = %name, %provider, "skill dir already exists");
            } else {
                self.fs.ensure_dir(&skill_dir)?;
            }

            let written = self
                .fs
                .write_new_file(&skill_dir.join(MANIFEST_FILE), &manifest)?;
            if !written {
                tracing::debug!(skill = %name, %provider, "keeping existing manifest");
            }
        }

        Ok(format!("Skill \"{name}\" created successfully."))
    }

    /// Remove the named skill from every provider that has it.
    pub fn delete(&self, name: &str) -> SkillOpResult {
        SkillOpResult::from_outcome("Delete skill", self.delete_inner(name))
    }

    fn delete_inner(&self, name: &str) -> AppResult<String> {
        let name = validate_skill_name(name)?;
        let mut deleted = 0usize;
        for (provider, root) in self.roots.iter() {
            let skill_dir = root.join(&name);
            if !self.fs.exists(&skill_dir) {
                continue;
            }
            tracing::info!(skill = %name, %provider, "deleting skill");
            self.fs.remove_tree(&skill_dir)?;
            deleted += 1;
        }
        Ok(format!(
            "Deleted skill \"{name}\" from {deleted} providers."
        ))
    }

    /// Export skills into `target`. Each destination is replaced wholesale.
    pub fn copy_skills(&self, names: &[String], target: &Path) -> SkillOpResult {
        if names.is_empty() {
            return SkillOpResult::fail("No skills selected");
        }
        if target.as_os_str().is_empty() {
            return SkillOpResult::fail("No target directory selected");
        }
        if let Err(err) = self.fs.ensure_dir(target) {
            tracing::warn!(target = %target.display(), "copy target unusable: {}", err);
            return SkillOpResult::fail(format!("Target path issue: {err}"));
        }
        SkillOpResult::from_outcome("Copy", self.copy_skills_inner(names, target))
    }

    fn copy_skills_inner(&self, names: &[String], target: &Path) -> AppResult<String> {
        let mut sources: Vec<(String, PathBuf)> = Vec::new();
        for name in names {
            let name = validate_skill_name(name)?;
            if sources.iter().any(|(n, _)| *n == name) {
                continue;
            }
            match self.locate(&name) {
                Some(src) => sources.push((name, src)),
                None => tracing::warn!(skill = %name, "skill not found in any provider"),
            }
        }

        if sources.is_empty() {
            return Err(AppError::NotFound(
                "could not find any of the selected skills on disk".to_string(),
            ));
        }

        // Checked up front so a bad target leaves every destination untouched.
        let mut plan = Vec::with_capacity(sources.len());
        for (name, src) in &sources {
            let dst = target.join(name);
            if self.check_copy_target(src, &dst)? {
                plan.push((name, src, dst));
            } else {
                tracing::debug!(skill = %name, "export target is the source itself");
            }
        }

        for (name, src, dst) in plan {
            if self.fs.exists(&dst) {
                self.fs.remove_tree(&dst)?;
            }
            tracing::info!(skill = %name, dst = %dst.display(), "exporting skill");
            self.fs.copy_tree(src, &dst)?;
        }

        Ok(format!(
            "Successfully copied {} skills to {}",
            sources.len(),
            target.display()
        ))
    }

    /// First provider (declaration order) holding a directory of that name.
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|(_, root)| root.join(name))
            .find(|candidate| self.fs.is_dir(candidate))
    }
}
