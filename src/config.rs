//! Resize settings.
//!
//! Settings come from three layers, later layers overriding earlier ones:
//!
//! 1. Stock defaults (longest edge 542px, quality 100)
//! 2. An optional TOML file passed with `--config`
//! 3. Command-line flags
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! max_size = 542     # Longest edge in pixels (>= 10)
//! quality = 100      # 1-100; JPEG quality, or PNG compression (100 = none)
//! recursive = false  # Descend into subdirectories
//! rename = false     # Rename outputs to 00001.jpg, 00002.png, ...
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// QQ mobile renders anything larger than this at sticker size.
pub const DEFAULT_MAX_EDGE: u32 = 542;

/// Smaller targets produce unusable images.
pub const MIN_MAX_EDGE: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings as written in a config file or collected from flags.
///
/// All fields have defaults, so a file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// Longest edge in pixels.
    pub max_size: u32,
    /// Encoding quality, 1-100.
    pub quality: u32,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Rename outputs sequentially.
    pub rename: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_EDGE,
            quality: Quality::default().value(),
            recursive: false,
            rename: false,
        }
    }
}

impl SettingsConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation(format!(
                "quality must be 1-100, got {}",
                self.quality
            )));
        }
        if self.max_size < MIN_MAX_EDGE {
            return Err(ConfigError::Validation(format!(
                "max_size must be at least {MIN_MAX_EDGE}, got {}",
                self.max_size
            )));
        }
        Ok(())
    }

    /// The part of the settings the resizer itself consumes.
    pub fn resize_config(&self) -> ResizeConfig {
        ResizeConfig {
            max_edge: self.max_size,
            quality: Quality::new(self.quality),
        }
    }
}

/// Parameters of the resize decision, passed explicitly to processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeConfig {
    pub max_edge: u32,
    pub quality: Quality,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        SettingsConfig::default().resize_config()
    }
}

/// How a batch is laid out on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Write here instead of overwriting in place.
    pub output_dir: Option<PathBuf>,
    pub recursive: bool,
    pub rename: bool,
    /// Decide and report only; touch nothing on disk.
    pub dry_run: bool,
}

/// Values explicitly given on the command line.
///
/// `None` means "not given", so the file or stock value stays in effect.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_size: Option<u32>,
    pub quality: Option<u32>,
    pub recursive: bool,
    pub rename: bool,
}

impl CliOverrides {
    fn to_toml(&self) -> toml::Value {
        let mut table = toml::Table::new();
        if let Some(max_size) = self.max_size {
            table.insert("max_size".into(), toml::Value::Integer(max_size.into()));
        }
        if let Some(quality) = self.quality {
            table.insert("quality".into(), toml::Value::Integer(quality.into()));
        }
        // Switches can only turn a setting on
        if self.recursive {
            table.insert("recursive".into(), toml::Value::Boolean(true));
        }
        if self.rename {
            table.insert("rename".into(), toml::Value::Boolean(true));
        }
        toml::Value::Table(table)
    }
}

/// Stock defaults as a TOML value, the base every overlay merges onto.
fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SettingsConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::Table::new()))
}

/// Deep-merge two TOML values. Overlay keys win.
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

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the effective settings from stock defaults, an optional config
/// file and command-line overrides, then validate the result.
pub fn load_settings(
    config_file: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<SettingsConfig, ConfigError> {
    let mut merged = stock_defaults_value();
    if let Some(path) = config_file {
        merged = merge_toml(merged, load_raw_config(path)?);
    }
    merged = merge_toml(merged, overrides.to_toml());

    let settings: SettingsConfig = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Returns a fully-commented stock config file.
///
/// Printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# qq-resize configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Longest edge in pixels. Images whose longest edge is larger are scaled
# down proportionally so that edge is exactly this long. Minimum 10.
max_size = 542

# Encoding quality, 1-100.
#   JPEG: passed to the encoder as-is (higher = better, larger files).
#   PNG:  lossless; mapped to a compression level where 100 means no
#         compression and 1 means maximum compression.
quality = 100

# Descend into subdirectories when the input is a directory.
recursive = false

# Write outputs as 00001.jpg, 00002.png, ... in processing order.
rename = false
"##
}
