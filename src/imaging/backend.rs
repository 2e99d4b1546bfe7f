//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the one operation every backend must
//! support: decode a source once and write each requested variant.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust with zero
//! external dependencies. Everything is statically linked into the binary.

use super::params::TransformParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// `Sync` is required because the worker pool shares one backend across all
/// of its threads.
pub trait ImageBackend: Sync {
    /// Decode the source once and write every requested variant.
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError>;
}
