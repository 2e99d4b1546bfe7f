//! Static asset sync.
//!
//! The assets directory is mirrored to `<output>/static/` on every run. The
//! mirror is destructive: whatever was under `<output>/static/` before is
//! removed first, so deleted assets do not linger.
//!
//! When the assets directory does not exist a built-in `style.css` is written
//! instead, so generated pages always have a stylesheet to load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Name of the static directory inside the output root.
pub const STATIC_DIR: &str = "static";

const BUILTIN_CSS: &str = include_str!("../static/style.css");

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot walk assets: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Assets path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// What the sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    /// Files copied (or written, for the built-in stylesheet).
    pub files: usize,
    /// True when the built-in stylesheet stood in for a missing assets directory.
    pub builtin: bool,
}

/// Replace `<output_root>/static` with a copy of `assets`.
pub fn sync_static(assets: &Path, output_root: &Path) -> Result<AssetReport, AssetError> {
    let dest = output_root.join(STATIC_DIR);
    clear(&dest)?;
    fs::create_dir_all(&dest)?;

    if !assets.exists() {
        debug!(assets = %assets.display(), "assets directory missing, writing built-in stylesheet");
        fs::write(dest.join("style.css"), BUILTIN_CSS)?;
        return Ok(AssetReport {
            files: 1,
            builtin: true,
        });
    }
    if !assets.is_dir() {
        return Err(AssetError::NotADirectory(assets.to_path_buf()));
    }

    let mut files = 0;
    for entry in WalkDir::new(assets).min_depth(1).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(assets) else {
            continue;
        };
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }

    debug!(files, dest = %dest.display(), "static assets synced");
    Ok(AssetReport {
        files,
        builtin: false,
    })
}

fn clear(dest: &Path) -> io::Result<()> {
    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dest),
        Ok(_) => fs::remove_file(dest),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
