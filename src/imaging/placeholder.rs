//! Fallback image substituted when a thumbnail cannot be generated.
//!
//! The bytes are produced once per run and written verbatim to both
//! destinations of every failed task, so pages never reference a missing file.

use super::backend::BackendError;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use std::path::Path;

const BUILTIN_WIDTH: u32 = 400;
const BUILTIN_HEIGHT: u32 = 250;

#[derive(Debug, Clone)]
pub struct Placeholder {
    bytes: Vec<u8>,
}

impl Placeholder {
    /// A neutral grey card with a darker diagonal cross.
    pub fn builtin() -> Result<Self, BackendError> {
        let (w, h) = (BUILTIN_WIDTH, BUILTIN_HEIGHT);
        let img = RgbImage::from_fn(w, h, |x, y| {
            // |x/w - y/h| or |x/w + y/h - 1| near zero puts the pixel on a diagonal
            let on_diag = (x * h).abs_diff(y * w) < 2 * w || (x * h + y * w).abs_diff(w * h) < 2 * w;
            let on_edge = x < 2 || y < 2 || x >= w - 2 || y >= h - 2;
            if on_diag || on_edge {
                Rgb([150, 150, 150])
            } else {
                Rgb([210, 210, 210])
            }
        });

        let mut bytes = Vec::new();
        img.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, 70))
            .map_err(|e| BackendError::Encode(format!("placeholder encode failed: {e}")))?;
        Ok(Self { bytes })
    }

    /// Use an existing image file as the placeholder, copied byte for byte.
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        Ok(Self {
            bytes: std::fs::read(path)?,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the placeholder to `dest`, replacing anything already there.
    pub fn write_to(&self, dest: &Path) -> std::io::Result<()> {
        std::fs::write(dest, &self.bytes)
    }
}
