//! Application configuration module.
//!
//! Handles loading and validating `cardscan.toml`. Every key has a serde
//! default, so a config file needs only the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! log_level = "warn"        # Default tracing filter when RUST_LOG is unset
//!
//! [crop]
//! max_edge = 400            # Longer edge cap for auto-cropped graphics (px)
//! quality = 85              # JPEG quality (1-100)
//!
//! [adjuster]
//! canvas_size = 400         # Square canvas and fit reference (px)
//! zoom_min = 0.1
//! zoom_max = 3.0
//! quality = 85              # JPEG quality of applied graphics (1-100)
//!
//! [processing]
//! max_threads = 4           # Parallel decode workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::adjuster::AdjusterConfig;
use crate::imaging::{CropConfig, Quality};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE: &str = "cardscan.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `cardscan.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Auto-crop settings.
    pub crop: CropSettings,
    /// Manual adjuster settings.
    pub adjuster: AdjusterSettings,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            crop: CropSettings::default(),
            adjuster: AdjusterSettings::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.crop.quality) {
            return Err(ConfigError::Validation("crop.quality must be 1-100".into()));
        }
        if !(1..=100).contains(&self.adjuster.quality) {
            return Err(ConfigError::Validation(
                "adjuster.quality must be 1-100".into(),
            ));
        }
        if self.crop.max_edge == 0 {
            return Err(ConfigError::Validation(
                "crop.max_edge must be non-zero".into(),
            ));
        }
        if self.adjuster.canvas_size == 0 {
            return Err(ConfigError::Validation(
                "adjuster.canvas_size must be non-zero".into(),
            ));
        }
        let (min, max) = (self.adjuster.zoom_min, self.adjuster.zoom_max);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::Validation(
                "adjuster zoom range must satisfy 0 < zoom_min <= zoom_max".into(),
            ));
        }
        Ok(())
    }

    pub fn crop_config(&self) -> CropConfig {
        CropConfig {
            max_edge: self.crop.max_edge,
            quality: Quality::new(self.crop.quality),
        }
    }

    pub fn adjuster_config(&self) -> AdjusterConfig {
        AdjusterConfig {
            canvas_size: self.adjuster.canvas_size,
            zoom_min: self.adjuster.zoom_min,
            zoom_max: self.adjuster.zoom_max,
            quality: Quality::new(self.adjuster.quality),
        }
    }
}

/// Auto-crop settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropSettings {
    /// Longer-edge cap for cropped graphics, in pixels. Crops are never upscaled.
    pub max_edge: u32,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            max_edge: 400,
            quality: 85,
        }
    }
}

/// Manual adjuster settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjusterSettings {
    /// Side of the square canvas in pixels; also the fit reference.
    pub canvas_size: u32,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// JPEG quality of the applied canvas.
    pub quality: u32,
}

impl Default for AdjusterSettings {
    fn default() -> Self {
        Self {
            canvas_size: 400,
            zoom_min: 0.1,
            zoom_max: 3.0,
            quality: 85,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decode workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse config text and validate it.
///
/// Every section and key is optional; missing ones take their defaults.
pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `cardscan.toml` in the given directory.
///
/// A missing file yields the defaults. Unknown keys and out-of-range values
/// are errors.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    parse_config(&fs::read_to_string(&config_path)?)
}

/// Returns a fully-commented stock `cardscan.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cardscan Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Tracing filter used when RUST_LOG is not set (error, warn, info, debug, trace).
log_level = "warn"

# ---------------------------------------------------------------------------
# Automatic crops from the extraction bounding boxes
# ---------------------------------------------------------------------------
[crop]
# Longer-edge cap for cropped logo/photo images, in pixels.
# Crops smaller than this are kept at their native size.
max_edge = 400

# JPEG quality (1 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Manual pan/zoom adjuster
# ---------------------------------------------------------------------------
[adjuster]
# Side of the square output canvas, in pixels. The initial zoom makes the
# shorter side of the source image span this square.
canvas_size = 400

# Zoom range; requested zoom values are clamped into it.
zoom_min = 0.1
zoom_max = 3.0

# JPEG quality of the applied graphic.
quality = 85

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel decode workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
