//! EXIF orientation handling.
//!
//! Cameras store pixels in sensor order and record how the picture should be
//! turned in the `Orientation` tag. Output thumbnails carry no EXIF, so the
//! rotation is baked into the pixels before resizing.

use super::calculations::Rotation;
use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read the EXIF `Orientation` tag, returning 1 (upright) when the file has
/// no EXIF block or it cannot be parsed.
pub fn read_orientation(path: &Path) -> u32 {
    let Ok(file) = File::open(path) else {
        return 1;
    };
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(data) => data
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .filter(|v| (1..=8).contains(v))
            .unwrap_or(1),
        Err(_) => 1,
    }
}

/// Rotate the image so it displays upright. The canvas grows to fit.
pub fn apply_rotation(img: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => img,
        Rotation::Cw90 => img.rotate90(),
        Rotation::Cw180 => img.rotate180(),
        Rotation::Cw270 => img.rotate270(),
    }
}
