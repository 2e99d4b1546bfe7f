//! Directory walking and thumbnail planning.
//!
//! Stage 1 of the gallery build. Walks the source tree depth-first, turning
//! every directory into a [`DirectoryNode`] and every regular file into a
//! [`GalleryItem`] with planned thumbnail paths.
//!
//! ## Traversal
//!
//! ```text
//! photos/                    → root node (page: index.html)
//! ├── a.jpg                  → item, task if thumbnails are missing
//! ├── .DS_Store              → ignored (hidden)
//! ├── pipe                   → skipped with a warning (not a file or directory)
//! └── sub/                   → child node, finished before its parent
//!     └── b.jpg
//! ```
//!
//! - Entries are visited in lexicographic order so output is reproducible.
//! - Symlinks are followed. Broken links and special files are skipped.
//! - Unreadable directories are skipped; the walk carries on with their siblings.
//! - A top-level directory named `static` is skipped with a warning. Its page
//!   and thumbnails would land in `<output>/static`, which the asset sync
//!   replaces.
//! - Names that are not valid UTF-8 are kept byte for byte on disk and shown
//!   lossily on pages.
//! - The output directory is never descended into, even when it lives inside
//!   the source tree.
//! - Symlink cycles are not detected. Behaviour on a cyclic tree is unspecified.
//!
//! ## Output
//!
//! [`scan`] returns the finished tree together with the flat task list and the
//! skipped entries. Nothing is accumulated in shared state, so the tree builder
//! is testable without any rendering.

use crate::assets::STATIC_DIR;
use crate::fingerprint::{EntryStamp, content_fingerprint};
use crate::plan::ThumbnailPlanner;
use crate::types::{DirectoryNode, GalleryItem, ThumbnailTask};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Why an entry was left out of the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    BrokenSymlink,
    /// FIFO, socket, device node, ...
    NotFileOrDirectory,
    Unreadable(String),
    /// Thumbnail destination could not be prepared.
    PlanFailed(String),
    /// Top-level directory whose output would collide with the asset directory.
    ReservedName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BrokenSymlink => write!(f, "broken symlink"),
            SkipReason::NotFileOrDirectory => write!(f, "neither a file nor a directory"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::PlanFailed(e) => write!(f, "cannot prepare thumbnails: {e}"),
            SkipReason::ReservedName => {
                write!(f, "name collides with the '{STATIC_DIR}' asset directory")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything the walk produced.
#[derive(Debug)]
pub struct ScanResult {
    pub root: DirectoryNode,
    pub tasks: Vec<ThumbnailTask>,
    pub skipped: Vec<SkippedEntry>,
}

impl ScanResult {
    /// Items whose thumbnails already existed.
    pub fn cache_hits(&self) -> usize {
        self.root.item_count() - self.tasks.len()
    }
}

enum EntryKind {
    File,
    Dir,
    Skip(SkipReason),
}

/// Walk `source_root`, planning thumbnails into `output_root`.
///
/// Fails only when the root itself cannot be read. Everything below the root
/// is best-effort: problems are logged and recorded in
/// [`ScanResult::skipped`].
pub fn scan(source_root: &Path, output_root: &Path) -> Result<ScanResult, ScanError> {
    if !source_root.is_dir() {
        return Err(ScanError::NotADirectory(source_root.to_path_buf()));
    }
    let source_root = fs::canonicalize(source_root)?;
    let excluded = fs::canonicalize(output_root).ok();

    let mut walker = Walker {
        planner: ThumbnailPlanner::new(&source_root, output_root),
        excluded,
        tasks: Vec::new(),
        skipped: Vec::new(),
    };
    let root = walker.walk_dir(&source_root, Path::new(""))?;

    Ok(ScanResult {
        root,
        tasks: walker.tasks,
        skipped: walker.skipped,
    })
}

struct Walker {
    planner: ThumbnailPlanner,
    excluded: Option<PathBuf>,
    tasks: Vec<ThumbnailTask>,
    skipped: Vec<SkippedEntry>,
}

impl Walker {
    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        warn!(path = %path.display(), %reason, "skipping entry");
        self.skipped.push(SkippedEntry { path, reason });
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match &self.excluded {
            Some(excluded) => fs::canonicalize(path).is_ok_and(|p| &p == excluded),
            None => false,
        }
    }

    fn walk_dir(&mut self, dir: &Path, rel: &Path) -> io::Result<DirectoryNode> {
        let names = self.collect_names(dir)?;

        let mut items = Vec::new();
        let mut subdirs = Vec::new();
        let mut children = Vec::new();
        let mut stamps = Vec::new();

        for os_name in names {
            let path = dir.join(&os_name);
            let name = os_name.to_string_lossy().into_owned();
            let (kind, modified) = classify(&path);

            match kind {
                EntryKind::File => match self.planner.plan(&path) {
                    Ok(planned) => {
                        if let Some(task) = planned.task {
                            self.tasks.push(task);
                        }
                        items.push(GalleryItem {
                            name: name.clone(),
                            source_path: path,
                            thumbnail_small: planned.paths.small,
                            thumbnail_large: planned.paths.large,
                        });
                    }
                    Err(e) => self.skip(path, SkipReason::PlanFailed(e.to_string())),
                },
                EntryKind::Dir if self.is_excluded(&path) => {
                    debug!(path = %path.display(), "not descending into output directory");
                    continue;
                }
                EntryKind::Dir if rel.as_os_str().is_empty() && os_name == STATIC_DIR => {
                    self.skip(path, SkipReason::ReservedName)
                }
                EntryKind::Dir => match self.walk_dir(&path, &rel.join(&os_name)) {
                    Ok(child) => {
                        subdirs.push(name.clone());
                        children.push(child);
                    }
                    Err(e) => self.skip(path, SkipReason::Unreadable(e.to_string())),
                },
                EntryKind::Skip(reason) => self.skip(path, reason),
            }

            stamps.push(EntryStamp::new(name, modified));
        }

        debug!(
            dir = %dir.display(),
            items = items.len(),
            subdirs = subdirs.len(),
            "directory scanned"
        );

        Ok(DirectoryNode {
            source_path: dir.to_path_buf(),
            rel_path: rel.to_path_buf(),
            items,
            subdirs,
            children,
            content_fingerprint: content_fingerprint(stamps),
        })
    }

    /// Visible entry names of `dir`, sorted by their raw bytes.
    fn collect_names(&mut self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            match entry {
                Ok(entry) => {
                    let name = entry.file_name();
                    if !name.as_encoded_bytes().starts_with(b".") {
                        names.push(name);
                    }
                }
                Err(e) => self.skip(dir.to_path_buf(), SkipReason::Unreadable(e.to_string())),
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Decide what an entry is, following symlinks.
///
/// Also returns the modification time used for the directory fingerprint.
/// Broken symlinks report the link's own mtime.
fn classify(path: &Path) -> (EntryKind, Option<SystemTime>) {
    match fs::metadata(path) {
        Ok(meta) => {
            let modified = meta.modified().ok();
            let kind = if meta.is_file() {
                EntryKind::File
            } else if meta.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Skip(SkipReason::NotFileOrDirectory)
            };
            (kind, modified)
        }
        Err(e) => match fs::symlink_metadata(path) {
            Ok(link) if link.file_type().is_symlink() => (
                EntryKind::Skip(SkipReason::BrokenSymlink),
                link.modified().ok(),
            ),
            _ => (EntryKind::Skip(SkipReason::Unreadable(e.to_string())), None),
        },
    }
}
