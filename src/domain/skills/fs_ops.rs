//! Usage: Narrow filesystem capability used by the skills engine.
//!
//! Every check goes to disk; nothing is cached because the provider roots
//! are shared with the CLIs themselves.

use crate::shared::error::{AppError, AppResult};
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait SkillFs: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Immediate subdirectories of `dir`, sorted by name.
    fn list_dirs(&self, dir: &Path) -> AppResult<Vec<PathBuf>>;

    fn read_to_string(&self, path: &Path) -> AppResult<String>;

    fn ensure_dir(&self, path: &Path) -> AppResult<()>;

    /// Mirror `src` into `dst`, creating `dst` when absent. Existing files
    /// with the same relative path are overwritten; other files are kept.
    fn copy_tree(&self, src: &Path, dst: &Path) -> AppResult<()>;

    /// Remove a directory tree or a single file. Missing paths are fine.
    fn remove_tree(&self, path: &Path) -> AppResult<()>;

    /// Create `path` with `contents` only if nothing is there yet.
    /// Returns whether the file was written.
    fn write_new_file(&self, path: &Path, contents: &str) -> AppResult<bool>;

    /// Symlink-free absolute form of `path`, which need not exist yet.
    fn real_path(&self, path: &Path) -> PathBuf {
        real_path(path)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl SkillFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dirs(&self, dir: &Path) -> AppResult<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(dir).map_err(|e| AppError::io("failed to read dir", dir, e))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::io("failed to read dir entry", dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                out.push(path);
            }
        }
        out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(out)
    }

    fn read_to_string(&self, path: &Path) -> AppResult<String> {
        std::fs::read_to_string(path).map_err(|e| AppError::io("failed to read", path, e))
    }

    fn ensure_dir(&self, path: &Path) -> AppResult<()> {
        std::fs::create_dir_all(path).map_err(|e| AppError::io("failed to create", path, e))
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> AppResult<()> {
        copy_dir_recursive(src, dst)
    }

    fn remove_tree(&self, path: &Path) -> AppResult<()> {
        remove_path_if_exists(path)
    }

    fn write_new_file(&self, path: &Path, contents: &str) -> AppResult<bool> {
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => return Err(AppError::io("failed to create", path, err)),
        };
        file.write_all(contents.as_bytes())
            .map_err(|e| AppError::io("failed to write", path, e))?;
        Ok(true)
    }
}

pub(crate) fn copy_dir_recursive(src: &Path, dst: &Path) -> AppResult<()> {
    std::fs::create_dir_all(dst).map_err(|e| AppError::io("failed to create", dst, e))?;
    let entries =
        std::fs::read_dir(src).map_err(|e| AppError::io("failed to read dir", src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io("failed to read dir entry", src, e))?;
        let path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if path.is_dir() {
            copy_dir_recursive(&path, &dst_path)?;
            continue;
        }
        std::fs::copy(&path, &dst_path).map_err(|e| AppError::io("failed to copy", &path, e))?;
    }
    Ok(())
}

/// Canonicalizes the deepest existing ancestor and re-appends the rest.
pub(crate) fn real_path(path: &Path) -> PathBuf {
    if let Ok(real) = std::fs::canonicalize(path) {
        return real;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            real_path(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}

pub(crate) fn remove_path_if_exists(path: &Path) -> AppResult<()> {
    // symlink_metadata so a dangling link is still removed
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return Ok(());
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| AppError::io("failed to remove", path, e))?;
        return Ok(());
    }
    std::fs::remove_file(path).map_err(|e| AppError::io("failed to remove", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_tree_mirrors_nested_files_and_keeps_extra_destination_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        std::fs::create_dir_all(src.join("scripts/lib")).expect("mkdir");
        std::fs::write(src.join("SKILL.md"), "description: demo").expect("write");
        std::fs::write(src.join("scripts/lib/run.py"), "print(1)").expect("write");

        let dst = tmp.path().join("dst");
        std::fs::create_dir_all(&dst).expect("mkdir");
        std::fs::write(dst.join("notes.txt"), "keep me").expect("write");
        std::fs::write(dst.join("SKILL.md"), "stale").expect("write");

        StdFs.copy_tree(&src, &dst).expect("copy");

        assert_eq!(
            std::fs::read_to_string(dst.join("SKILL.md")).expect("read"),
            "description: demo"
        );
        assert!(dst.join("scripts/lib/run.py").is_file());
        assert!(dst.join("notes.txt").is_file());
    }

    #[test]
    fn list_dirs_skips_files_and_sorts() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for name in ["zeta", "alpha", "mid"] {
            std::fs::create_dir(tmp.path().join(name)).expect("mkdir");
        }
        std::fs::write(tmp.path().join("README.md"), "x").expect("write");

        let names: Vec<String> = StdFs
            .list_dirs(tmp.path())
            .expect("list")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn write_new_file_never_clobbers() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("SKILL.md");
        assert!(StdFs.write_new_file(&path, "first").expect("write"));
        assert!(!StdFs.write_new_file(&path, "second").expect("write"));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "first");
    }

    #[test]
    fn remove_tree_handles_missing_files_and_dirs() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("skill");
        std::fs::create_dir_all(dir.join("nested")).expect("mkdir");
        let file = tmp.path().join("loose.txt");
        std::fs::write(&file, "x").expect("write");

        StdFs.remove_tree(&dir).expect("remove dir");
        StdFs.remove_tree(&file).expect("remove file");
        StdFs.remove_tree(&tmp.path().join("absent")).expect("remove missing");

        assert!(!dir.exists());
        assert!(!file.exists());
    }

    #[test]
    fn real_path_resolves_missing_tail_under_existing_ancestor() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = std::fs::canonicalize(tmp.path()).expect("canonicalize");
        assert_eq!(
            real_path(&tmp.path().join("not/yet/here")),
            base.join("not/yet/here")
        );
    }

    #[cfg(unix)]
    #[test]
    fn real_path_sees_through_symlinks() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let target = tmp.path().join("skills");
        std::fs::create_dir_all(target.join("pdf")).expect("mkdir");
        let link = tmp.path().join("alias");
        std::os::unix::fs::symlink(&target, &link).expect("symlink");

        assert_eq!(real_path(&link.join("pdf")), real_path(&target.join("pdf")));
        assert_eq!(real_path(&link.join("new")), real_path(&target).join("new"));
    }
}
