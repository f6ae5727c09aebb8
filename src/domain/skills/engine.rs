use super::fs_ops::{SkillFs, StdFs};
use super::paths::ProviderRoots;
use super::types::Provider;
use crate::shared::error::{AppError, AppResult};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Skill catalog and reconciliation over a fixed set of provider roots.
///
/// The engine holds no skill state of its own: every operation re-reads the
/// provider directories, so edits made by the CLIs between calls are seen on
/// the next call.
pub struct SkillsEngine<F = StdFs> {
    pub(super) roots: ProviderRoots,
    pub(super) fs: F,
    pub(super) staging_dir: Option<PathBuf>,
}

impl SkillsEngine<StdFs> {
    pub fn new(roots: ProviderRoots) -> Self {
        Self::with_fs(roots, StdFs)
    }
}

impl<F: SkillFs> SkillsEngine<F> {
    pub fn with_fs(roots: ProviderRoots, fs: F) -> Self {
        Self {
            roots,
            fs,
            staging_dir: None,
        }
    }

    /// Parent directory for archive extraction (defaults to the OS temp dir).
    pub fn with_staging_dir(mut self, dir: PathBuf) -> Self {
        self.staging_dir = Some(dir);
        self
    }

    pub fn roots(&self) -> &ProviderRoots {
        &self.roots
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn paths(&self) -> BTreeMap<Provider, String> {
        self.roots.to_display_map()
    }

    /// Best-effort creation of every provider root; failures are only logged.
    pub fn ensure_roots(&self) {
        for (provider, root) in self.roots.iter() {
            if self.fs.exists(root) {
                continue;
            }
            if let Err(err) = self.fs.ensure_dir(root) {
                tracing::warn!(%provider, "failed to create skills directory: {}", err);
            }
        }
    }

    /// Skill directories (with manifest) under one provider root, by name.
    pub(super) fn skill_dirs(&self, root: &Path) -> AppResult<Vec<(String, PathBuf)>> {
        if !self.fs.is_dir(root) {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for dir in self.fs.list_dirs(root)? {
            let Some(name) = dir.file_name().and_then(|v| v.to_str()).map(str::to_string) else {
                continue;
            };
            if self.has_manifest(&dir) {
                out.push((name, dir));
            }
        }
        Ok(out)
    }

    pub(super) fn has_manifest(&self, dir: &Path) -> bool {
        self.fs.is_file(&dir.join(super::skill_md::MANIFEST_FILE))
    }

    /// `Ok(false)` when `dst` resolves to `src` itself, so there is nothing to copy.
    /// Nested paths in either direction are rejected: copying would recurse into its
    /// own output or clobber the source.
    pub(super) fn check_copy_target(&self, src: &Path, dst: &Path) -> AppResult<bool> {
        let src_real = self.fs.real_path(src);
        let dst_real = self.fs.real_path(dst);
        if src_real == dst_real {
            return Ok(false);
        }
        if dst_real.starts_with(&src_real) || src_real.starts_with(&dst_real) {
            return Err(AppError::invalid(format!(
                "cannot copy {} onto overlapping path {}",
                src.display(),
                dst.display()
            )));
        }
        Ok(true)
    }
}

/// Skill names are directory names: exactly one normal path component.
pub(super) fn validate_skill_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("skill name is required"));
    }

    let mut count = 0;
    for comp in Path::new(name).components() {
        count += 1;
        match comp {
            Component::Normal(_) => {}
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(AppError::invalid(format!(
                    "skill name must be a single directory name: {name}"
                )))
            }
        }
    }
    if count != 1 {
        return Err(AppError::invalid(format!(
            "skill name must be a single directory name: {name}"
        )));
    }

    Ok(name.to_string())
}
