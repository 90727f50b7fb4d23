//! Filesystem path utilities.
//!
//! - `normalize_path` - absolute form (canonicalize + fallback)
//! - `resolve_from` - resolve a config-relative path against a base directory
//! - `StagedFile` - write beside the target, then replace it in one rename

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `path` against `base` unless it is already absolute.
#[inline]
pub fn resolve_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// New file contents written beside their target, not yet renamed into place.
///
/// Committing renames the temp file over the target, so readers see either
/// the previous file or the complete new one. Dropping an uncommitted stage removes the temp file, so a failed
/// multi-file write leaves every target untouched.
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Write `contents` to a sibling temp file of `path`, creating parent
    /// directories as needed.
    pub fn stage(path: &Path, contents: &[u8]) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(file_name);
        tmp_name.push(".tmp");

        let staged = Self {
            tmp: path.with_file_name(tmp_name),
            target: path.to_path_buf(),
            committed: false,
        };
        let mut file = fs::File::create(&staged.tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(staged)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the temp file over the target.
    pub fn commit(mut self) -> io::Result<()> {
        fs::rename(&self.tmp, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_from() {
        assert_eq!(
            resolve_from(Path::new("/site"), Path::new("content")),
            PathBuf::from("/site/content")
        );
        assert_eq!(
            resolve_from(Path::new("/site"), Path::new("/elsewhere/content")),
            PathBuf::from("/elsewhere/content")
        );
    }

    #[test]
    fn test_stage_creates_parents_and_commit_replaces() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out/nested/table.json");

        StagedFile::stage(&target, b"[1]").unwrap().commit().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"[1]");

        StagedFile::stage(&target, b"[2]").unwrap().commit().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"[2]");

        // No temp file left behind
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_dropped_stage_leaves_target_untouched() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("index.json");
        fs::write(&target, "old").unwrap();

        let staged = StagedFile::stage(&target, b"new").unwrap();
        assert_eq!(staged.target(), target);
        drop(staged);

        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert!(!dir.path().join(".index.json.tmp").exists());
    }
}
