use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DEFAULT_REGION_PADDING: u32 = 10;

/// Scanner settings. Every field has a default, so a config file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Re-decode each detected region from a crop of the original image
    pub crop_regions: bool,
    /// Pixels added around a detected region before cropping
    pub region_padding: u32,
    /// Directory for per-stage preview images
    pub debug_out: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            crop_regions: false,
            region_padding: DEFAULT_REGION_PADDING,
            debug_out: None,
        }
    }
}

impl ScanConfig {
    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }
}
