//! Thumbnail planning: where each thumbnail lives and whether it must be built.
//!
//! Every source file `F` at `<source>/<rel>` maps to two siblings in the
//! mirrored output tree:
//!
//! ```text
//! <output>/<rel>.small.jpg
//! <output>/<rel>.large.jpg
//! ```
//!
//! The mapping is a pure function of the relative path, so two distinct
//! sources never share a destination. A task is only registered when at least
//! one destination is missing; re-running on an unchanged tree schedules no
//! image work at all.

use crate::types::{ThumbnailPaths, ThumbnailTask};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SMALL_SUFFIX: &str = ".small.jpg";
pub const LARGE_SUFFIX: &str = ".large.jpg";

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path} is not inside the source root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Maps source files into the output tree.
#[derive(Debug, Clone)]
pub struct ThumbnailPlanner {
    source_root: PathBuf,
    output_root: PathBuf,
}

/// Result of planning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    pub paths: ThumbnailPaths,
    /// `None` on a cache hit.
    pub task: Option<ThumbnailTask>,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl ThumbnailPlanner {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Compute destinations for `source` without touching the filesystem.
    pub fn paths_for(&self, source: &Path) -> Result<ThumbnailPaths, PlanError> {
        let rel = source
            .strip_prefix(&self.source_root)
            .map_err(|_| PlanError::OutsideRoot {
                path: source.to_path_buf(),
                root: self.source_root.clone(),
            })?;
        let dest = self.output_root.join(rel);
        Ok(ThumbnailPaths {
            small: with_suffix(&dest, SMALL_SUFFIX),
            large: with_suffix(&dest, LARGE_SUFFIX),
        })
    }

    /// Compute destinations, create their parent directory, and decide
    /// whether work is needed.
    pub fn plan(&self, source: &Path) -> Result<Planned, PlanError> {
        let paths = self.paths_for(source)?;
        if let Some(parent) = paths.small.parent() {
            fs::create_dir_all(parent)?;
        }

        let cached = paths.small.is_file() && paths.large.is_file();
        let task = (!cached).then(|| ThumbnailTask {
            source: source.to_path_buf(),
            small: paths.small.clone(),
            large: paths.large.clone(),
        });
        Ok(Planned { paths, task })
    }
}
