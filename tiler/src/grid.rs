//! Discovery of tile files and their arrangement into columns.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::coords::{parse_coords, TileCoordinate};
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileEntry {
    pub coord: TileCoordinate,
    pub path: PathBuf,
}

/// Tiles grouped by X coordinate. Columns iterate in ascending X, tiles
/// within a column in ascending Y.
#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    columns: BTreeMap<u32, Vec<TileEntry>>,
}

impl TileGrid {
    /// Lists the regular files in `dir` and parses a coordinate from each
    /// name. Any file without the coordinate pattern fails the whole pass.
    pub fn discover(dir: &Path, sink: &dyn EventSink) -> Result<TileGrid> {
        let files = common::file_utils::list_files(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        sink.info(Event::PartsRead { count: files.len() });

        let entries = files
            .into_iter()
            .map(|path| {
                Ok(TileEntry {
                    coord: parse_coords(&path)?,
                    path,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TileGrid::from_entries(entries))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TileEntry>) -> TileGrid {
        let mut columns: BTreeMap<u32, Vec<TileEntry>> = BTreeMap::new();
        for entry in entries {
            columns.entry(entry.coord.x).or_default().push(entry);
        }
        for column in columns.values_mut() {
            column.sort_by(|a, b| a.coord.y.cmp(&b.coord.y).then_with(|| a.path.cmp(&b.path)));
        }

        TileGrid { columns }
    }

    pub fn columns(&self) -> impl Iterator<Item = (u32, &[TileEntry])> {
        self.columns.iter().map(|(x, column)| (*x, column.as_slice()))
    }

    /// All tiles in placement order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileEntry> {
        self.columns.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The max-Y tile of the max-X column: the bottom-right tile when the
    /// grid is complete.
    pub fn last_tile(&self) -> Option<&TileEntry> {
        self.columns
            .last_key_value()
            .and_then(|(_, column)| column.last())
    }

    /// Positions `(x, y)` where column `x` exists and row `y` is used by some
    /// other column, but no tile sits there.
    pub fn missing_coords(&self) -> Vec<TileCoordinate> {
        let rows: BTreeSet<u32> = self.tiles().map(|tile| tile.coord.y).collect();

        let mut missing = Vec::new();
        for (&x, column) in &self.columns {
            let present: BTreeSet<u32> = column.iter().map(|tile| tile.coord.y).collect();
            missing.extend(
                rows.difference(&present)
                    .map(|&y| TileCoordinate::new(x, y)),
            );
        }
        missing
    }
}
