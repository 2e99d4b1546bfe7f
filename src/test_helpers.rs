//! Shared test utilities for the dir-gallery test suite.
//!
//! Fixture images are synthesised with the `image` crate so tests never depend
//! on binary files checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! make_tree(&tmp.path().join("src"), &["a.jpg", "sub/b.jpg"]);
//! let result = scan(&tmp.path().join("src"), &tmp.path().join("out")).unwrap();
//! assert_eq!(item_names(&result.root), vec!["a.jpg"]);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

use crate::types::DirectoryNode;

// =========================================================================
// Fixture images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn encode_jpeg(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    bytes
}

/// Write a small valid JPEG with the given dimensions.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, encode_jpeg(&gradient(width, height))).unwrap();
}

/// Minimal little-endian TIFF block holding a single `Orientation` entry.
fn exif_orientation_segment(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II*\0");
    tiff.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_le_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_le_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_le_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_le_bytes()); // count
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    let mut segment = vec![0xFF, 0xE1];
    let len = (2 + 6 + tiff.len()) as u16;
    segment.extend_from_slice(&len.to_be_bytes());
    segment.extend_from_slice(b"Exif\0\0");
    segment.extend_from_slice(&tiff);
    segment
}

/// Write a JPEG carrying an EXIF `Orientation` tag.
pub fn write_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    write_image_with_orientation(path, &gradient(width, height), orientation);
}

/// Encode `img` as JPEG with an EXIF `Orientation` tag.
///
/// The APP1 segment is spliced in directly after SOI.
pub fn write_image_with_orientation(path: &Path, img: &RgbImage, orientation: u16) {
    let jpeg = encode_jpeg(img);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "encoder must start with SOI");

    let mut bytes = Vec::with_capacity(jpeg.len() + 64);
    bytes.extend_from_slice(&jpeg[..2]);
    bytes.extend_from_slice(&exif_orientation_segment(orientation));
    bytes.extend_from_slice(&jpeg[2..]);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// Write a PNG filled with a single RGBA colour.
pub fn write_png_rgba(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(path)
        .unwrap();
}

// =========================================================================
// Fixture trees
// =========================================================================

/// Create files (and their parent directories) under `root`.
///
/// `.jpg`/`.jpeg` entries get a real 16x12 JPEG; anything else gets text.
pub fn make_tree(root: &Path, files: &[&str]) {
    std::fs::create_dir_all(root).unwrap();
    for rel in files {
        let path = root.join(rel);
        let is_jpeg = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
            .unwrap_or(false);
        if is_jpeg {
            write_jpeg(&path, 16, 12);
        } else {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, rel.as_bytes()).unwrap();
        }
    }
}

// =========================================================================
// Tree lookups
// =========================================================================

/// Item names of a node, in order.
pub fn item_names(node: &DirectoryNode) -> Vec<&str> {
    node.items.iter().map(|i| i.name.as_str()).collect()
}

/// Find a node by its path relative to the tree root. Panics if not found.
pub fn find_node<'a>(root: &'a DirectoryNode, rel: &str) -> &'a DirectoryNode {
    fn walk<'a>(node: &'a DirectoryNode, rel: &Path) -> Option<&'a DirectoryNode> {
        if node.rel_path == rel {
            return Some(node);
        }
        node.children.iter().find_map(|c| walk(c, rel))
    }
    walk(root, Path::new(rel)).unwrap_or_else(|| panic!("directory '{rel}' not found in tree"))
}
