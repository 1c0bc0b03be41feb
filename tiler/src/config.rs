use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::TileFormat;
use crate::size::SizeSpec;

/// Settings for one split run. Missing fields fall back to the defaults:
/// a 100x100 px window moved by 50x50 px, written as PNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub window: SizeSpec,
    pub stride: SizeSpec,
    pub format: TileFormat,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            window: SizeSpec::pixels(100, 100),
            stride: SizeSpec::pixels(50, 50),
            format: TileFormat::Png,
        }
    }
}

impl SplitConfig {
    /// Loads a YAML or JSON config, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        common::file_format::load_file(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
