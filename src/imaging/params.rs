//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which variants a task needs) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 85). Clamped on construction.
//! - [`Bounds`]: Maximum box an output must fit inside.
//! - [`VariantParams`]: One encoded output: destination, bounds, quality and
//!   whether the JPEG gets optimized Huffman tables.
//! - [`TransformParams`]: A source image plus every variant produced from a single decode.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Bounding box for a downscale-only resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Bounds {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

/// A single encoded output derived from the decoded source.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantParams {
    pub output: PathBuf,
    pub bounds: Bounds,
    pub quality: Quality,
    /// Build Huffman tables from the image's own statistics instead of the
    /// standard ones. Smaller files, one extra pass over the coefficients.
    pub optimize: bool,
}

/// Decode `source` once, then produce every variant in order.
///
/// Variants are listed largest first; each is resized from the oriented
/// source, never from a previously shrunk variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    pub source: PathBuf,
    pub variants: Vec<VariantParams>,
}
