//! Bounded worker pool for thumbnail generation.
//!
//! Tasks run on a dedicated rayon pool whose width is the configured job
//! count, so at most that many transforms are in flight. [`run_tasks`] blocks
//! until every task has an outcome.
//!
//! ## Failure handling
//!
//! A failing task never affects its siblings. When a transform fails the
//! placeholder image is written to both destinations and the task reports
//! [`ThumbnailOutcome::Failure`].
//!
//! ## Cancellation
//!
//! [`CancelFlag`] is checked before each task starts. Once it is set, tasks
//! already running finish normally and every task not yet started reports
//! [`ThumbnailOutcome::Cancelled`] without touching the filesystem.

use crate::imaging::{ImageBackend, Placeholder, ThumbnailSpec, create_thumbnails};
use crate::types::{ThumbnailOutcome, ThumbnailTask};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Shared stop signal, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress reported while the pool drains its tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// Emitted once before any task runs.
    Started { total: usize, jobs: usize },
    Generated { source: PathBuf },
    Failed {
        source: PathBuf,
        reason: String,
        placeholder_written: bool,
    },
}

/// Everything a worker needs besides the task itself.
pub struct PoolConfig<'a> {
    pub jobs: usize,
    pub spec: ThumbnailSpec,
    pub placeholder: &'a Placeholder,
}

/// Run every task once, at most `config.jobs` at a time.
///
/// Outcomes come back in task order.
pub fn run_tasks(
    tasks: &[ThumbnailTask],
    config: &PoolConfig<'_>,
    backend: &impl ImageBackend,
    cancel: &CancelFlag,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Vec<ThumbnailOutcome>, PoolError> {
    let jobs = config.jobs.max(1);
    if let Some(tx) = &events {
        tx.send(ProcessEvent::Started {
            total: tasks.len(),
            jobs,
        })
        .ok();
    }
    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|i| format!("thumbnail-{i}"))
        .build()?;
    debug!(tasks = tasks.len(), jobs, "worker pool started");

    let outcomes = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                if cancel.is_cancelled() {
                    return ThumbnailOutcome::Cancelled;
                }
                let outcome = run_one(task, config, backend);
                if let Some(tx) = &events {
                    tx.send(event_for(task, &outcome)).ok();
                }
                outcome
            })
            .collect()
    });

    Ok(outcomes)
}

fn run_one(
    task: &ThumbnailTask,
    config: &PoolConfig<'_>,
    backend: &impl ImageBackend,
) -> ThumbnailOutcome {
    match create_thumbnails(backend, task, &config.spec) {
        Ok(()) => ThumbnailOutcome::Success,
        Err(e) => {
            warn!(source = %task.source.display(), error = %e, "thumbnail generation failed");
            ThumbnailOutcome::Failure {
                reason: e.to_string(),
                placeholder_written: write_placeholder(task, config.placeholder),
            }
        }
    }
}

/// Copy the placeholder over both destinations. False if either write failed.
fn write_placeholder(task: &ThumbnailTask, placeholder: &Placeholder) -> bool {
    for dest in [&task.large, &task.small] {
        if let Err(e) = placeholder.write_to(dest) {
            warn!(dest = %dest.display(), error = %e, "cannot write placeholder");
            return false;
        }
    }
    true
}

fn event_for(task: &ThumbnailTask, outcome: &ThumbnailOutcome) -> ProcessEvent {
    match outcome {
        ThumbnailOutcome::Failure {
            reason,
            placeholder_written,
        } => ProcessEvent::Failed {
            source: task.source.clone(),
            reason: reason.clone(),
            placeholder_written: *placeholder_written,
        },
        _ => ProcessEvent::Generated {
            source: task.source.clone(),
        },
    }
}
