//! Tile file naming: `<stem>_x<X>_y<Y>.<ext>`.
//!
//! The top-left offset of each tile is stored in its file name. Splitting
//! writes names with [`tile_file_name`] and merging reads them back with
//! [`parse_coords`]; both sides go through this module only.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Greedy stem, so the last `_x.._y..` pair in the name wins.
static COORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<stem>.*)_x(?P<x>\d+)_y(?P<y>\d+)$").expect("coordinate regex is valid")
});

/// Top-left pixel offset of a tile inside the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoordinate {
    pub x: u32,
    pub y: u32,
}

impl TileCoordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}_y{}", self.x, self.y)
    }
}

pub fn tile_file_name(stem: &str, coord: TileCoordinate, extension: &str) -> String {
    format!("{stem}_{coord}.{extension}")
}

/// Extracts the tile coordinate from a file name or path. Only the final
/// path component is inspected, without its extension, and it must end in
/// `_x<X>_y<Y>`: `a_x1_y2.tar.png` is rejected because its stem ends in `.tar`.
pub fn parse_coords<P: AsRef<Path>>(file_name: P) -> Result<TileCoordinate> {
    let (_, coord) = parse_name(file_name.as_ref())?;
    Ok(coord)
}

/// Returns the stem the tile was written with, e.g. `photo` for
/// `photo_x0_y50.png`.
pub fn parse_stem<P: AsRef<Path>>(file_name: P) -> Result<String> {
    let (stem, _) = parse_name(file_name.as_ref())?;
    Ok(stem)
}

fn parse_name(path: &Path) -> Result<(String, TileCoordinate)> {
    let parse_error = || Error::Parse {
        name: path.display().to_string(),
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(parse_error)?;
    let caps = COORDS_RE.captures(stem).ok_or_else(parse_error)?;

    let x = caps["x"].parse::<u32>().map_err(|_| parse_error())?;
    let y = caps["y"].parse::<u32>().map_err(|_| parse_error())?;

    Ok((caps["stem"].to_string(), TileCoordinate::new(x, y)))
}
