//! High-level image operations.
//!
//! These functions turn a [`ThumbnailTask`] into backend parameters and run
//! them. The size classes themselves come from [`ThumbnailSpec`].

use super::backend::{BackendError, ImageBackend};
use super::params::{Bounds, Quality, TransformParams, VariantParams};
use crate::config::ThumbnailsConfig;
use crate::types::ThumbnailTask;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Bounds and quality for one size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeClass {
    pub bounds: Bounds,
    pub quality: Quality,
    pub optimize: bool,
}

/// The two size classes every gallery item gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub large: SizeClass,
    pub small: SizeClass,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self::from_config(&ThumbnailsConfig::default())
    }
}

impl ThumbnailSpec {
    pub fn from_config(config: &ThumbnailsConfig) -> Self {
        Self {
            large: SizeClass {
                bounds: Bounds::new(config.large.max_width, config.large.max_height),
                quality: Quality::new(config.large.quality),
                optimize: true,
            },
            small: SizeClass {
                bounds: Bounds::new(config.small.max_width, config.small.max_height),
                quality: Quality::new(config.small.quality),
                optimize: false,
            },
        }
    }
}

/// Plan the transform for a task without executing it.
///
/// The large variant comes first; both are derived from the same decode.
pub fn plan_transform(task: &ThumbnailTask, spec: &ThumbnailSpec) -> TransformParams {
    TransformParams {
        source: task.source.clone(),
        variants: vec![
            VariantParams {
                output: task.large.clone(),
                bounds: spec.large.bounds,
                quality: spec.large.quality,
                optimize: spec.large.optimize,
            },
            VariantParams {
                output: task.small.clone(),
                bounds: spec.small.bounds,
                quality: spec.small.quality,
                optimize: spec.small.optimize,
            },
        ],
    }
}

/// Produce both thumbnails for a task.
pub fn create_thumbnails(
    backend: &impl ImageBackend,
    task: &ThumbnailTask,
    spec: &ThumbnailSpec,
) -> Result<()> {
    backend.transform(&plan_transform(task, spec))
}
