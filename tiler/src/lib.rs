//! Tiler - sliding-window image tiling and reassembly.
//!
//! An image is cut into window-sized tiles at regular stride offsets. Each
//! tile is written as `<stem>_x<X>_y<Y>.<ext>`, so a directory of tiles can
//! later be merged back onto a canvas using nothing but the file names.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tiler::{CanvasSizing, SplitConfig, TracingSink, merge_dir, split_file};
//!
//! let sink = TracingSink;
//! let report = split_file("photo.png".as_ref(), "tiles".as_ref(), &SplitConfig::default(), &sink)?;
//! println!("Wrote {} tiles", report.tile_count());
//!
//! let merged = merge_dir("tiles".as_ref(), "merged.png".as_ref(), CanvasSizing::default(), &sink)?;
//! ```

pub mod config;
pub mod coords;
pub mod diff;
pub mod error;
pub mod events;
pub mod grid;
pub mod image;
pub mod merge;
pub mod size;
pub mod split;
pub mod timing;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::SplitConfig;
pub use coords::{parse_coords, tile_file_name, TileCoordinate};
pub use diff::{check_files, diff, DiffOutcome};
pub use error::{Error, Result};
pub use events::{CapturingSink, Event, EventSink, MissingCause, Severity, TracingSink};
pub use grid::{TileEntry, TileGrid};
pub use crate::image::{Image, TileFormat};
pub use merge::{canvas_size, merge, merge_dir, CanvasSizing, MergeReport};
pub use size::{resolve, ImageSize, ResolvedSize, SizeRole, SizeSpec};
pub use split::{split, split_file, SplitPlan, SplitReport};
pub use timing::{timed, ScopedTimer};
