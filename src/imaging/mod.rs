//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Orientation** | `kamadak-exif` `Orientation` tag |
//! | **Transform → JPEG** | flatten + rotate + Lanczos3 + `jpeg-encoder` |
//! | **Placeholder** | in-memory JPEG card, or a user-supplied file |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and rotation math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining tasks + backend

pub mod backend;
mod calculations;
pub mod operations;
mod orientation;
mod params;
pub mod placeholder;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{Rotation, fit_within};
pub use operations::{SizeClass, ThumbnailSpec, create_thumbnails, plan_transform};
pub use orientation::read_orientation;
pub use params::{Bounds, Quality, TransformParams, VariantParams};
pub use placeholder::Placeholder;
pub use rust_backend::RustBackend;
