//! Usage: Import a skill folder or zip archive into chosen providers.

use super::engine::{validate_skill_name, SkillsEngine};
use super::fs_ops::SkillFs;
use super::skill_md::MANIFEST_FILE;
use super::types::{dedup_providers, Provider, SkillOpResult};
use crate::shared::error::{AppError, AppResult};
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

const STAGING_PREFIX: &str = "skill-import-";
const MACOS_METADATA_DIR: &str = "__MACOSX";

/// Where to copy from and under which name.
#[derive(Debug)]
pub(super) struct ResolvedImport {
    pub(super) skill_name: String,
    pub(super) skill_root: PathBuf,
    // Removed from disk when the import finishes, whatever the outcome.
    staging: Option<TempDir>,
}

impl ResolvedImport {
    pub(super) fn staging_path(&self) -> Option<&Path> {
        self.staging.as_ref().map(TempDir::path)
    }
}

impl<F: SkillFs> SkillsEngine<F> {
    /// Import is deliberate: same-named skills at the targets are overwritten.
    pub fn import_skill(&self, source: &Path, targets: &[Provider]) -> SkillOpResult {
        SkillOpResult::from_outcome("Import", self.import_inner(source, targets))
    }

    fn import_inner(&self, source: &Path, targets: &[Provider]) -> AppResult<String> {
        if !self.fs.exists(source) {
            return Err(AppError::NotFound(format!(
                "source file does not exist: {}",
                source.display()
            )));
        }
        let targets = dedup_providers(targets);
        if targets.is_empty() {
            return Err(AppError::invalid("at least one target provider is required"));
        }
        if !is_zip_archive(source) && !self.fs.is_dir(source) {
            return Err(AppError::invalid(format!(
                "import source must be a directory or a .zip archive: {}",
                source.display()
            )));
        }

        tracing::info!(source = %source.display(), "importing skill");
        let resolved = resolve_source(source, self.staging_dir.as_deref())?;

        if !self.has_manifest(&resolved.skill_root) {
            tracing::warn!(
                skill = %resolved.skill_name,
                "{MANIFEST_FILE} not found in import source; importing anyway"
            );
        }

        // Every target is checked before the first copy.
        let mut plan = Vec::with_capacity(targets.len());
        for target in &targets {
            let dst = self.roots.root(*target).join(&resolved.skill_name);
            let needs_copy = self.check_copy_target(&resolved.skill_root, &dst)?;
            plan.push((*target, dst, needs_copy));
        }

        for (target, dst, needs_copy) in &plan {
            if !needs_copy {
                tracing::info!(skill = %resolved.skill_name, provider = %target, "import source already in place");
                continue;
            }
            tracing::info!(skill = %resolved.skill_name, provider = %target, dst = %dst.display(), "copying imported skill");
            self.fs.copy_tree(&resolved.skill_root, dst)?;
        }

        Ok(format!(
            "Imported \"{}\" to {} providers.",
            resolved.skill_name,
            plan.len()
        ))
    }
}

pub(super) fn is_zip_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|v| v.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

pub(super) fn resolve_source(source: &Path, staging_parent: Option<&Path>) -> AppResult<ResolvedImport> {
    let stem_name = file_stem_name(source)?;
    if !is_zip_archive(source) {
        return Ok(ResolvedImport {
            skill_name: stem_name,
            skill_root: source.to_path_buf(),
            staging: None,
        });
    }

    let staging = make_staging_dir(staging_parent)?;
    extract_zip(source, staging.path())?;
    let (skill_name, skill_root) = pick_skill_root(staging.path(), stem_name)?;
    Ok(ResolvedImport {
        skill_name,
        skill_root,
        staging: Some(staging),
    })
}

fn file_stem_name(path: &Path) -> AppResult<String> {
    let stem = path
        .file_stem()
        .and_then(|v| v.to_str())
        .ok_or_else(|| AppError::invalid(format!("cannot derive skill name from {}", path.display())))?;
    validate_skill_name(stem)
}

fn make_staging_dir(parent: Option<&Path>) -> AppResult<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX);
    match parent {
        Some(parent) => {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("failed to create", parent, e))?;
            builder
                .tempdir_in(parent)
                .map_err(|e| AppError::io("failed to create staging dir in", parent, e))
        }
        None => builder
            .tempdir()
            .map_err(|e| AppError::io("failed to create staging dir in", &std::env::temp_dir(), e)),
    }
}

/// Single wrapping folder -> that folder and its name; anything else -> the
/// extraction root under the archive's own name.
fn pick_skill_root(extract_root: &Path, archive_name: String) -> AppResult<(String, PathBuf)> {
    let entries = std::fs::read_dir(extract_root)
        .map_err(|e| AppError::io("failed to read dir", extract_root, e))?;
    let mut top = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io("failed to read dir entry", extract_root, e))?;
        top.push(entry.path());
    }

    if let [only] = top.as_slice() {
        if only.is_dir() {
            if let Some(name) = only.file_name().and_then(|v| v.to_str()) {
                return Ok((validate_skill_name(name)?, only.clone()));
            }
        }
    }

    Ok((archive_name, extract_root.to_path_buf()))
}

pub(super) fn extract_zip(archive_path: &Path, dst_dir: &Path) -> AppResult<()> {
    let file = std::fs::File::open(archive_path)
        .map_err(|e| AppError::io("failed to open", archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::Archive(format!("failed to open zip archive: {e}")))?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| AppError::Archive(format!("failed to read zip entry: {e}")))?;
        let name = file.name().replace('\\', "/");
        if name.is_empty() {
            continue;
        }

        let rel = Path::new(&name);
        if rel.is_absolute() {
            return Err(AppError::Archive(format!(
                "invalid zip entry path (absolute): {name}"
            )));
        }
        for comp in rel.components() {
            match comp {
                Component::CurDir | Component::Normal(_) => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(AppError::Archive(format!("invalid zip entry path: {name}")));
                }
            }
        }
        if rel
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == MACOS_METADATA_DIR)
        {
            continue;
        }

        let out_path = dst_dir.join(rel);
        if file.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|e| AppError::io("failed to create", &out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("failed to create", parent, e))?;
        }

        let mut out_file = std::fs::File::create(&out_path)
            .map_err(|e| AppError::io("failed to create", &out_path, e))?;
        std::io::copy(&mut file, &mut out_file)
            .map_err(|e| AppError::io("failed to write", &out_path, e))?;
    }

    Ok(())
}
