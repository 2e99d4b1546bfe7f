//! The full gallery build.
//!
//! ```text
//! 1. Scan      source/  →  DirectoryNode tree + ThumbnailTask list
//! 2. Pages     tree     →  <destination>/**/index.html
//! 3. Process   tasks    →  <rel>.small.jpg / <rel>.large.jpg   ┐ concurrent
//!    Assets    assets/  →  <destination>/static/               ┘
//! ```
//!
//! Pages only need the planned thumbnail paths, so they are written before
//! any image work starts. The asset sync runs on its own thread alongside the
//! worker pool and is joined before [`run`] returns.

use crate::assets::{self, AssetError, AssetReport};
use crate::generate::{self, GenerateError, PageContext};
use crate::imaging::{BackendError, ImageBackend, Placeholder, ThumbnailSpec};
use crate::pool::{self, CancelFlag, PoolConfig, PoolError, ProcessEvent};
use crate::scan::{self, ScanError, SkippedEntry};
use crate::types::ThumbnailOutcome;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Page generation failed: {0}")]
    Generate(#[from] GenerateError),
    #[error("Static asset sync failed: {0}")]
    Assets(#[from] AssetError),
    #[error("Placeholder unavailable: {0}")]
    Placeholder(#[from] BackendError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("None of the {0} thumbnails could be written")]
    NothingWritten(usize),
    #[error("Static asset thread panicked")]
    AssetThreadPanicked,
}

/// Inputs of one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Mirrored to `<destination>/static`.
    pub assets: PathBuf,
    pub static_url: Option<String>,
    pub original_base: Option<String>,
    pub title: Option<String>,
    pub jobs: usize,
    pub thumbnails: ThumbnailSpec,
    /// Custom failure image; the built-in card is used when `None`.
    pub placeholder: Option<PathBuf>,
    /// Where to write the tree as JSON, if anywhere.
    pub manifest: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            assets: PathBuf::from("static"),
            static_url: None,
            original_base: None,
            title: Some("Gallery".to_string()),
            jobs: 8,
            thumbnails: ThumbnailSpec::default(),
            placeholder: None,
            manifest: None,
        }
    }

    fn page_context(&self) -> PageContext {
        PageContext {
            title_prefix: self.title.clone(),
            static_url: self.static_url.clone(),
            original_base: self.original_base.clone(),
        }
    }
}

/// Counts of everything a build did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub items: usize,
    pub generated: usize,
    pub cached: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub skipped: Vec<SkippedEntry>,
    pub assets: Option<AssetReport>,
}

impl BuildReport {
    /// Thumbnails that had to be built this run.
    pub fn scheduled(&self) -> usize {
        self.generated + self.failed + self.cancelled
    }

    fn record(&mut self, outcomes: &[ThumbnailOutcome]) {
        for outcome in outcomes {
            match outcome {
                ThumbnailOutcome::Success => self.generated += 1,
                ThumbnailOutcome::Failure { .. } => self.failed += 1,
                ThumbnailOutcome::Cancelled => self.cancelled += 1,
            }
        }
    }
}

/// Run a complete build.
///
/// Individual thumbnail failures are reported, not returned as errors. The
/// build only fails on setup problems, or when there was thumbnail work and
/// not a single destination could be populated.
pub fn run(
    options: &BuildOptions,
    backend: &impl ImageBackend,
    cancel: &CancelFlag,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BuildReport, BuildError> {
    fs::create_dir_all(&options.destination)?;
    let placeholder = match &options.placeholder {
        Some(path) => Placeholder::from_file(path)?,
        None => Placeholder::builtin()?,
    };

    let scanned = scan::scan(&options.source, &options.destination)?;
    info!(
        directories = scanned.root.directory_count(),
        items = scanned.root.item_count(),
        tasks = scanned.tasks.len(),
        "source scanned"
    );

    let pages = generate::write_pages(&scanned.root, &options.destination, &options.page_context())?;
    if let Some(path) = &options.manifest {
        generate::write_manifest(&scanned.root, path)?;
    }

    let config = PoolConfig {
        jobs: options.jobs,
        spec: options.thumbnails,
        placeholder: &placeholder,
    };

    let (outcomes, assets) = std::thread::scope(|s| {
        let asset_sync =
            s.spawn(|| assets::sync_static(&options.assets, &options.destination));
        let outcomes = pool::run_tasks(&scanned.tasks, &config, backend, cancel, events);
        let assets = asset_sync
            .join()
            .map_err(|_| BuildError::AssetThreadPanicked);
        (outcomes, assets)
    });
    let outcomes = outcomes?;
    let assets = assets??;

    let mut report = BuildReport {
        pages,
        items: scanned.root.item_count(),
        cached: scanned.cache_hits(),
        skipped: scanned.skipped,
        assets: Some(assets),
        ..Default::default()
    };
    report.record(&outcomes);

    let populated = outcomes
        .iter()
        .filter(|o| o.destinations_populated())
        .count();
    let attempted = outcomes
        .iter()
        .filter(|o| !matches!(o, ThumbnailOutcome::Cancelled))
        .count();
    if attempted > 0 && populated == 0 {
        return Err(BuildError::NothingWritten(attempted));
    }

    info!(
        pages = report.pages,
        generated = report.generated,
        cached = report.cached,
        failed = report.failed,
        cancelled = report.cancelled,
        "build finished"
    );
    Ok(report)
}
