//! Reassembly of a tile directory onto a blank canvas.


use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rayon::prelude::*;

use crate::coords::TileCoordinate;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink, MissingCause};
use crate::grid::{TileEntry, TileGrid};
use crate::image::Image;
use crate::size::ImageSize;
use crate::timing::timed;

/// How the canvas dimensions are derived from the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CanvasSizing {
    /// Offset plus size of [`TileGrid::last_tile`]. Assumes that tile is the
    /// bottom-right extremity of the grid.
    #[default]
    BottomRightTile,
    /// Maximum extent over every tile. Reads all tile headers.
    Bounds,
}

#[derive(Clone, Debug)]
pub struct MergeReport {
    pub image: Image,
    /// Tiles written onto the canvas.
    pub placed: usize,
    /// Grid positions left unfilled, in the order they were reported.
    pub missing: Vec<TileCoordinate>,
}

/// Computes the canvas size for `grid`.
pub fn canvas_size(grid: &TileGrid, sizing: CanvasSizing) -> Result<ImageSize> {
    match sizing {
        CanvasSizing::BottomRightTile => {
            let last = grid.last_tile().ok_or(Error::EmptyGrid)?;
            let tile = Image::read_size(&last.path)?;
            Ok(extent(last.coord, tile))
        }
        CanvasSizing::Bounds => {
            let sizes = grid
                .tiles()
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|entry| Ok(extent(entry.coord, Image::read_size(&entry.path)?)))
                .collect::<Result<Vec<_>>>()?;

            Ok(sizes
                .into_iter()
                .fold(ImageSize::default(), |acc, size| ImageSize {
                    height: acc.height.max(size.height),
                    width: acc.width.max(size.width),
                }))
        }
    }
}

fn extent(coord: TileCoordinate, tile: ImageSize) -> ImageSize {
    ImageSize::new(
        coord.y.saturating_add(tile.height),
        coord.x.saturating_add(tile.width),
    )
}

/// Places every tile of `grid` on a zero-filled canvas.
///
/// A tile that cannot be decoded or does not fit the canvas is reported as
/// [`Event::MissingTile`] and skipped; so is every hole in the grid. Only a
/// failure to size or allocate the canvas aborts the merge.
pub fn merge(grid: &TileGrid, sizing: CanvasSizing, sink: &dyn EventSink) -> Result<MergeReport> {
    if grid.is_empty() {
        return Err(Error::EmptyGrid);
    }

    let size = canvas_size(grid, sizing)?;
    sink.info(Event::SizeCalculated { size });

    let mut canvas = Image::try_new_empty(size)?;
    let mut placed = 0;
    let mut missing = Vec::new();

    for (_, column) in grid.columns() {
        // Decode in parallel, place in grid order so overlaps resolve the
        // same way on every run.
        let decoded: Vec<Result<Image>> = column
            .par_iter()
            .map(|entry| Image::read_file(&entry.path))
            .collect();

        for (entry, tile) in column.iter().zip(decoded) {
            match place(&mut canvas, entry, tile) {
                Ok(()) => placed += 1,
                Err(cause) => {
                    sink.error(Event::MissingTile {
                        coord: entry.coord,
                        cause,
                    });
                    missing.push(entry.coord);
                }
            }
        }
    }

    for coord in grid.missing_coords() {
        sink.error(Event::MissingTile {
            coord,
            cause: MissingCause::Absent,
        });
        missing.push(coord);
    }

    Ok(MergeReport {
        image: canvas,
        placed,
        missing,
    })
}

fn place(
    canvas: &mut Image,
    entry: &TileEntry,
    tile: Result<Image>,
) -> std::result::Result<(), MissingCause> {
    let tile = tile.map_err(|err| MissingCause::Unreadable {
        reason: err.to_string(),
    })?;

    canvas
        .blit(&tile, entry.coord.x, entry.coord.y)
        .map_err(|err| match err {
            Error::OutOfBounds { tile, canvas, .. } => MissingCause::DoesNotFit { tile, canvas },
            other => MissingCause::Unreadable {
                reason: other.to_string(),
            },
        })
}

/// Discovers the tiles in `input_dir`, merges them and saves the result to
/// `output_path`.
pub fn merge_dir(
    input_dir: &Path,
    output_path: &Path,
    sizing: CanvasSizing,
    sink: &dyn EventSink,
) -> Result<MergeReport> {
    timed(sink, "merge_image", || {
        let grid = TileGrid::discover(input_dir, sink)?;
        let report = merge(&grid, sizing, sink)?;
        report.image.save_file(output_path)?;
        sink.info(Event::ImageMerged {
            path: output_path.to_path_buf(),
        });

        Ok(report)
    })
}

impl FromStr for CanvasSizing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bottom-right" | "bottom-right-tile" | "last-tile" => Ok(CanvasSizing::BottomRightTile),
            "bounds" => Ok(CanvasSizing::Bounds),
            _ => Err(Error::UnsupportedFormat(format!("canvas sizing '{s}'"))),
        }
    }
}

impl fmt::Display for CanvasSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasSizing::BottomRightTile => f.write_str("bottom-right"),
            CanvasSizing::Bounds => f.write_str("bounds"),
        }
    }
}
