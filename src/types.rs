//! Shared types passed between the walk, the worker pool, and page rendering.
//!
//! The walker produces a [`DirectoryNode`] tree plus a flat list of
//! [`ThumbnailTask`]s; the pool turns tasks into [`ThumbnailOutcome`]s; the
//! page builder reads only the tree.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// One source directory and everything directly inside it.
///
/// Built bottom-up by the walker and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryNode {
    /// Absolute path of the source directory.
    #[serde(serialize_with = "lossy_path")]
    pub source_path: PathBuf,
    /// Path relative to the tree root (empty for the root itself).
    #[serde(serialize_with = "lossy_path")]
    pub rel_path: PathBuf,
    /// Files, in lexicographic order.
    pub items: Vec<GalleryItem>,
    /// Subdirectory names, in lexicographic order.
    pub subdirs: Vec<String>,
    /// Child nodes, same order as `subdirs`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DirectoryNode>,
    /// Hash of the (name, mtime) pairs of every direct entry.
    pub content_fingerprint: String,
}

impl DirectoryNode {
    /// Total number of directories in this subtree, including `self`.
    pub fn directory_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DirectoryNode::directory_count)
            .sum::<usize>()
    }

    /// Total number of gallery items in this subtree.
    pub fn item_count(&self) -> usize {
        self.items.len()
            + self
                .children
                .iter()
                .map(DirectoryNode::item_count)
                .sum::<usize>()
    }

    /// Depth below the tree root (root = 0).
    pub fn depth(&self) -> usize {
        self.rel_path.components().count()
    }
}

/// A file shown on a gallery page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryItem {
    /// File name, relative to the containing directory.
    pub name: String,
    /// Absolute path of the original file.
    #[serde(serialize_with = "lossy_path")]
    pub source_path: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub thumbnail_small: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub thumbnail_large: PathBuf,
}

/// Destination pair for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailPaths {
    pub small: PathBuf,
    pub large: PathBuf,
}

/// Pending thumbnail work for one source file.
///
/// Only created on a cache miss; consumed exactly once by the worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailTask {
    #[serde(serialize_with = "lossy_path")]
    pub source: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub small: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub large: PathBuf,
}

/// Paths go into the manifest as text; bytes that are not UTF-8 are replaced.
fn lossy_path<P: AsRef<Path>, S: Serializer>(path: &P, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

/// What happened to a task in the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Success,
    /// Generation failed. `placeholder_written` is true when the fallback
    /// image landed on both destinations.
    Failure {
        reason: String,
        placeholder_written: bool,
    },
    /// Never started because the run was interrupted.
    Cancelled,
}

impl ThumbnailOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ThumbnailOutcome::Success)
    }

    /// True when both destinations hold an image after this task.
    pub fn destinations_populated(&self) -> bool {
        match self {
            ThumbnailOutcome::Success => true,
            ThumbnailOutcome::Failure {
                placeholder_written,
                ..
            } => *placeholder_written,
            ThumbnailOutcome::Cancelled => false,
        }
    }
}
