//! # dir-gallery
//!
//! Turns an arbitrary directory tree of images into a static, browsable HTML
//! gallery: one index page per directory, each file shown through a small and
//! a large JPEG thumbnail.
//!
//! # Architecture
//!
//! ```text
//! 1. Scan      source/  →  DirectoryNode tree + ThumbnailTask list  (single thread)
//! 2. Pages     tree     →  <destination>/**/index.html
//! 3. Process   tasks    →  thumbnails, on a bounded worker pool
//!    Assets    static/  →  <destination>/static/  (concurrently with 3)
//! ```
//!
//! The walk returns plain data. Nothing is accumulated in global state, so the
//! tree and the task list can be inspected and tested without rendering or
//! encoding anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source tree, classifies entries, plans thumbnails |
//! | [`plan`] | Maps a source file to its two thumbnail paths, decides cache hits |
//! | [`fingerprint`] | Per-directory hash of entry names and modification times |
//! | [`pool`] | Bounded rayon pool draining the task list, placeholder fallback |
//! | [`imaging`] | Decode, flatten, orient, resize, and encode thumbnails |
//! | [`generate`] | Page model and Maud rendering of `index.html` files |
//! | [`assets`] | Destructive mirror of the assets directory into `static/` |
//! | [`pipeline`] | Runs the phases in order and collects a [`pipeline::BuildReport`] |
//! | [`config`] | Layered TOML configuration with validation |
//! | [`types`] | Data passed between phases |
//! | [`output`] | CLI progress and summary formatting |
//!
//! # Incremental Builds
//!
//! A file is only transformed when one of its thumbnails is missing. Running
//! twice on an unchanged tree does no image work and rewrites every page
//! byte for byte. Deleting a single thumbnail rebuilds exactly that file.
//!
//! Thumbnail freshness is judged by existence alone. Replacing a source image
//! in place keeps the old thumbnails until they are deleted.

pub mod assets;
pub mod config;
pub mod fingerprint;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod pool;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
