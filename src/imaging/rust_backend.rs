//! Pure Rust image processing backend with no system dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Flatten transparency | per-pixel blend onto white |
//! | Orientation | `kamadak-exif` + `DynamicImage::rotate*` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `jpeg-encoder`, optionally with optimized Huffman tables |

use super::backend::{BackendError, ImageBackend};
use super::calculations::{Rotation, fit_within};
use super::orientation::{apply_rotation, read_orientation};
use super::params::{TransformParams, VariantParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the content, so misnamed files still decode.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_err = |reason: String| BackendError::Decode {
        path: path.display().to_string(),
        reason,
    };
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_err(e.to_string()))
}

/// Composite any alpha channel onto an opaque white background.
///
/// JPEG has no transparency; without this, transparent regions would come out
/// in whatever colour happens to sit under the alpha. Palette images with a
/// transparent index are expanded to RGBA by the decoder, so they take the
/// same path.
pub(crate) fn flatten(img: DynamicImage) -> DynamicImage {
    if !img.color().has_alpha() {
        return img;
    }
    let rgba = img.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(flat)
}

/// Resize to fit the variant bounds (downscale only), then encode.
fn write_variant(img: &DynamicImage, variant: &VariantParams) -> Result<(), BackendError> {
    let (w, h) = fit_within((img.width(), img.height()), variant.bounds.as_tuple());
    let rgb = if (w, h) == (img.width(), img.height()) {
        img.to_rgb8()
    } else {
        image::imageops::resize(&img.to_rgb8(), w, h, FilterType::Lanczos3)
    };
    save_jpeg(&rgb, &variant.output, variant.quality.value(), variant.optimize)
}

/// Sibling path used while a file is being written.
fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Encode as JPEG, writing to a temporary sibling and renaming into place so
/// readers never observe a half-written thumbnail.
fn save_jpeg(img: &RgbImage, path: &Path, quality: u8, optimize: bool) -> Result<(), BackendError> {
    let bytes = encode_jpeg(img, quality, optimize)?;
    let tmp = partial_path(path);
    if let Err(e) = std::fs::write(&tmp, &bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Encode to an in-memory JPEG. JPEG frames are limited to 65535px per edge.
fn encode_jpeg(img: &RgbImage, quality: u8, optimize: bool) -> Result<Vec<u8>, BackendError> {
    let too_large = || {
        BackendError::Encode(format!(
            "{}x{} exceeds the JPEG frame limit",
            img.width(),
            img.height()
        ))
    };
    let width = u16::try_from(img.width()).map_err(|_| too_large())?;
    let height = u16::try_from(img.height()).map_err(|_| too_large())?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality);
    encoder.set_optimized_huffman_tables(optimize);
    encoder
        .encode(img.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
        let img = flatten(load_image(&params.source)?);
        let rotation = Rotation::from_exif(read_orientation(&params.source));
        let img = apply_rotation(img, rotation);

        for variant in &params.variants {
            write_variant(&img, variant)?;
        }
        Ok(())
    }
}
