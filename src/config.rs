//! Gallery configuration module.
//!
//! Handles loading, validating, and merging configuration. Values are layered:
//! stock defaults, then an optional TOML file passed with `--config`, then
//! command-line flags (applied by the binary).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Gallery"            # Page title prefix
//! # static_url = "/static"     # Absolute URL of static assets (default: relative path)
//! # original_url = "https://example.com/photos"  # Link items to full-size originals
//!
//! [thumbnails.large]
//! max_width = 1920
//! max_height = 1200
//! quality = 85
//!
//! [thumbnails.small]
//! max_width = 400
//! max_height = 250
//! quality = 70
//!
//! [processing]
//! jobs = 8                     # Thumbnail worker pool width
//!
//! [paths]
//! assets = "static"            # Directory mirrored into <destination>/static
//! # placeholder = "missing.jpg"  # Image used when a thumbnail cannot be built
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [thumbnails.small]
//! quality = 60
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Page metadata and link targets.
    pub site: SiteConfig,
    /// Thumbnail size classes.
    pub thumbnails: ThumbnailsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Input locations besides the source tree.
    pub paths: PathsConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [
            ("thumbnails.large", &self.thumbnails.large),
            ("thumbnails.small", &self.thumbnails.small),
        ] {
            if !(1..=100).contains(&size.quality) {
                return Err(ConfigError::Validation(format!(
                    "{name}.quality must be 1-100"
                )));
            }
            if size.max_width == 0 || size.max_height == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} dimensions must be non-zero"
                )));
            }
        }
        if self.processing.jobs == 0 {
            return Err(ConfigError::Validation(
                "processing.jobs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Page metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Prefix shown in every page title.
    pub title: String,
    /// Absolute URL of the static assets. When absent, each page links to
    /// `static/` through a relative path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_url: Option<String>,
    /// Base URL under which the original images are published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            static_url: None,
            original_url: None,
        }
    }
}

/// Both thumbnail size classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Variant shown when an item is opened.
    pub large: SizeConfig,
    /// Variant shown in the page grid.
    pub small: SizeConfig,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            large: SizeConfig {
                max_width: 1920,
                max_height: 1200,
                quality: 85,
            },
            small: SizeConfig {
                max_width: 400,
                max_height: 250,
                quality: 70,
            },
        }
    }
}

/// Bounding box and JPEG quality for one size class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Number of thumbnail workers.
    pub jobs: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { jobs: 8 }
    }
}

/// Input locations besides the source tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory mirrored into `<destination>/static/`.
    pub assets: String,
    /// Image copied over both thumbnails when generation fails. A built-in
    /// grey card is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets: "static".to_string(),
            placeholder: None,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration.
///
/// With no path, the stock defaults are returned. An explicit path must
/// exist; its values are merged on top of the defaults and validated.
pub fn load_config(path: Option<&Path>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = match path {
        None => None,
        Some(p) => Some(load_raw_config(p)?.ok_or_else(|| ConfigError::NotFound(p.to_path_buf()))?),
    };
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Printed by `--print-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# dir-gallery Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with --config. Command-line flags override its values.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Prefix shown in every page title.
title = "Gallery"

# Absolute URL of the static assets. Default: relative path to <destination>/static.
# static_url = "/static"

# Base URL of the full-resolution originals. When set, items link there
# instead of to the large thumbnail.
# original_url = "https://example.com/photos"

# ---------------------------------------------------------------------------
# Thumbnails (JPEG, downscale only, aspect ratio preserved)
# ---------------------------------------------------------------------------
[thumbnails.large]
max_width = 1920
max_height = 1200
quality = 85

[thumbnails.small]
max_width = 400
max_height = 250
quality = 70

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Number of parallel thumbnail workers.
jobs = 8

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# Directory mirrored into <destination>/static on every run.
assets = "static"

# Image written in place of thumbnails that cannot be generated.
# Default: a built-in grey card.
# placeholder = "missing.jpg"
"##
}
