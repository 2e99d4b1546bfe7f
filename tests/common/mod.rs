//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use dir_gallery::imaging::{BackendError, ImageBackend, RustBackend, TransformParams};
use dir_gallery::pipeline::BuildOptions;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write a gradient JPEG of the given size, creating parent directories.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    })
    .save(path)
    .unwrap();
}

/// Options for a build of `<tmp>/src` into `<tmp>/html`.
pub fn options(tmp: &Path) -> BuildOptions {
    let mut options = BuildOptions::new(tmp.join("src"), tmp.join("html"));
    options.assets = tmp.join("assets");
    options.jobs = 4;
    options
}

/// The real backend, recording which sources it was asked to transform.
#[derive(Default)]
pub struct CountingBackend {
    inner: RustBackend,
    sources: Mutex<Vec<PathBuf>>,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformed sources, sorted by file name.
    pub fn transformed(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .sources
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl ImageBackend for CountingBackend {
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
        self.sources.lock().unwrap().push(params.source.clone());
        self.inner.transform(params)
    }
}
