//! Content directory scanning.
//!
//! Finds index documents (`page.md`, `page.mdx`, ...) at any depth and
//! assembles the directory tree that contains them. Hidden entries and
//! `node_modules` are never descended into.

use jwalk::{Parallelism, WalkDir};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{debug, log};

/// Directory names skipped during the walk (in addition to hidden entries).
const IGNORED_DIRS: &[&str] = &["node_modules"];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("content root {0} does not exist or is not a directory")]
    MissingRoot(PathBuf),

    #[error("content root {} contains no index files ({})", root.display(), names.join(", "))]
    EmptyRoot { root: PathBuf, names: Vec<String> },
}

/// One matching file and its position in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Directory holding the file.
    pub parent: PathBuf,
    /// Directory depth below the root (`0` for the root's own index file).
    pub depth: usize,
}

/// A directory that (transitively) contains at least one index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDir {
    pub path: PathBuf,
    pub name: String,
    /// This directory's own index document, if any.
    pub index_file: Option<PathBuf>,
    /// Subdirectories, sorted by name.
    pub dirs: Vec<ScanDir>,
}

impl ScanDir {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            index_file: None,
            dirs: Vec::new(),
        }
    }

    /// Number of index documents in this subtree.
    pub fn document_count(&self) -> usize {
        usize::from(self.index_file.is_some())
            + self.dirs.iter().map(Self::document_count).sum::<usize>()
    }

    /// Child directory named `name`, created in sorted position if missing.
    fn child_mut(&mut self, name: &str) -> &mut ScanDir {
        let pos = match self.dirs.binary_search_by(|d| d.name.as_str().cmp(name)) {
            Ok(pos) => pos,
            Err(pos) => {
                self.dirs.insert(pos, ScanDir::new(self.path.join(name)));
                pos
            }
        };
        &mut self.dirs[pos]
    }
}

/// Check that `root` exists and is a directory.
fn check_root(root: &Path) -> Result<(), ScanError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ScanError::MissingRoot(root.to_path_buf()))
    }
}

/// Lazily yield every file under `root` whose name is one of `names`.
///
/// Entries are visited in sorted file-name order. Unreadable entries are
/// skipped with a debug message.
pub fn scan_files<'a>(
    root: &Path,
    names: &'a [String],
) -> Result<impl Iterator<Item = ScannedFile> + 'a, ScanError> {
    check_root(root)?;

    let walker = WalkDir::new(root)
        .sort(true)
        .skip_hidden(true)
        .parallelism(Parallelism::Serial)
        .process_read_dir(|_depth, _path, _state, children| {
            children.retain(|entry| {
                entry.as_ref().map_or(true, |e| {
                    !(e.file_type().is_dir()
                        && IGNORED_DIRS.iter().any(|d| e.file_name() == *d))
                })
            });
        });

    Ok(walker.into_iter().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("scan"; "skipping unreadable entry: {}", err);
                return None;
            }
        };
        if !entry.file_type().is_file() {
            return None;
        }
        let file_name = entry.file_name().to_str()?;
        if !names.iter().any(|n| n == file_name) {
            return None;
        }

        let path = entry.path();
        let parent = path.parent()?.to_path_buf();
        Some(ScannedFile {
            depth: entry.depth().saturating_sub(1),
            parent,
            path,
        })
    }))
}

/// Assemble the directory tree of all index files under `root`.
///
/// When one directory holds several index files, the name listed first in
/// `names` wins and the others are reported.
pub fn scan_tree(root: &Path, names: &[String]) -> Result<ScanDir, ScanError> {
    let mut tree = ScanDir::new(root.to_path_buf());
    let mut found = 0usize;

    for file in scan_files(root, names)? {
        found += 1;
        let Ok(rel) = file.parent.strip_prefix(root) else {
            continue;
        };

        let mut dir = &mut tree;
        for component in rel.components() {
            dir = dir.child_mut(&component.as_os_str().to_string_lossy());
        }

        match &dir.index_file {
            Some(existing) if name_rank(existing, names) <= name_rank(&file.path, names) => {
                log!("warning"; "ignoring {}: {} already provides this directory", file.path.display(), existing.display());
            }
            Some(existing) => {
                log!("warning"; "ignoring {}: {} takes precedence", existing.display(), file.path.display());
                dir.index_file = Some(file.path);
            }
            None => dir.index_file = Some(file.path),
        }
    }

    if found == 0 {
        return Err(ScanError::EmptyRoot {
            root: root.to_path_buf(),
            names: names.to_vec(),
        });
    }

    Ok(tree)
}

/// Position of a file's name in the configured list.
fn name_rank(path: &Path, names: &[String]) -> usize {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| names.iter().position(|name| name == n))
        .unwrap_or(usize::MAX)
}
