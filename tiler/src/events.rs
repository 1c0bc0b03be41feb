//! Structured progress and failure events.
//!
//! Components never log directly; they report [`Event`]s to an [`EventSink`]
//! handed to them by the caller. The binary uses [`TracingSink`], tests use
//! [`CapturingSink`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;

use crate::coords::TileCoordinate;
use crate::size::{ImageSize, ResolvedSize, SizeRole};

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    NoImage {
        path: PathBuf,
    },
    ImageLoaded {
        size: ImageSize,
    },
    PercentWindow,
    WindowSize {
        size: ResolvedSize,
    },
    PercentStride,
    StrideSize {
        size: ResolvedSize,
    },
    SplitFinished {
        count: usize,
    },
    SizeError {
        role: SizeRole,
        resolved: ResolvedSize,
        image: ImageSize,
    },
    PartsRead {
        count: usize,
    },
    SizeCalculated {
        size: ImageSize,
    },
    ImageMerged {
        path: PathBuf,
    },
    ImageVerified,
    ImageDiff {
        differing_pixels: usize,
        max_diff: u8,
    },
    SizeMismatch {
        reference: ImageSize,
        candidate: ImageSize,
    },
    MissingTile {
        coord: TileCoordinate,
        cause: MissingCause,
    },
    Runtime {
        label: &'static str,
        elapsed: Duration,
    },
}

/// Why a grid position ended up unfilled on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum MissingCause {
    /// No file for this position although its row and column exist.
    Absent,
    /// The tile extends past the canvas.
    DoesNotFit { tile: ImageSize, canvas: ImageSize },
    /// The tile file could not be decoded.
    Unreadable { reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Event {
    /// Stable machine-readable name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::NoImage { .. } => "no_image",
            Event::ImageLoaded { .. } => "image_loaded",
            Event::PercentWindow => "percent_window",
            Event::WindowSize { .. } => "window_size",
            Event::PercentStride => "percent_stride",
            Event::StrideSize { .. } => "stride_size",
            Event::SplitFinished { .. } => "finished",
            Event::SizeError { .. } => "size_error",
            Event::PartsRead { .. } => "parts_read",
            Event::SizeCalculated { .. } => "size_calculated",
            Event::ImageMerged { .. } => "image_merged",
            Event::ImageVerified => "image_verified",
            Event::ImageDiff { .. } => "image_diff",
            Event::SizeMismatch { .. } => "size_mismatch",
            Event::MissingTile { .. } => "image_missing",
            Event::Runtime { .. } => "runtime",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::NoImage { path } => {
                write!(f, "Can't find the image in the path: {}.", path.display())
            }
            Event::ImageLoaded { size } => write!(
                f,
                "Successfully loaded image. Height: {} px, width: {} px.",
                size.height, size.width
            ),
            Event::PercentWindow => write!(f, "Using the window with percent values."),
            Event::WindowSize { size } => write!(
                f,
                "Window height: {} px, width: {} px.",
                size.height, size.width
            ),
            Event::PercentStride => write!(f, "Using the stride with percent values."),
            Event::StrideSize { size } => write!(
                f,
                "Stride height: {} px, width: {} px.",
                size.height, size.width
            ),
            Event::SplitFinished { count } => write!(f, "Split the image into {count} parts."),
            Event::SizeError {
                role,
                resolved,
                image,
            } => write!(
                f,
                "{role} size {resolved} must be non-zero and smaller than image size {image}."
            ),
            Event::PartsRead { count } => {
                write!(f, "Successfully read {count} images in the input directory.")
            }
            Event::SizeCalculated { size } => write!(
                f,
                "Calculated the size of the image to merge. Height: {} px, width: {} px.",
                size.height, size.width
            ),
            Event::ImageMerged { path } => write!(
                f,
                "Successfully merged the image from the split parts into {}.",
                path.display()
            ),
            Event::ImageVerified => write!(f, "The images successfully passed difference check."),
            Event::ImageDiff {
                differing_pixels,
                max_diff,
            } => write!(
                f,
                "Found difference in the images: {differing_pixels} pixels differ, max channel difference {max_diff}."
            ),
            Event::SizeMismatch {
                reference,
                candidate,
            } => write!(
                f,
                "Found difference in the images: reference size {reference}, merged size {candidate}."
            ),
            Event::MissingTile { coord, cause } => match cause {
                MissingCause::Absent => write!(f, "Missing split part at {coord}."),
                MissingCause::DoesNotFit { tile, canvas } => write!(
                    f,
                    "Split part at {coord} with size {tile} does not fit canvas {canvas}."
                ),
                MissingCause::Unreadable { reason } => {
                    write!(f, "Split part at {coord} could not be read: {reason}.")
                }
            },
            Event::Runtime { label, elapsed } => write!(
                f,
                "{label} was executed in {:.6} seconds.",
                elapsed.as_secs_f64()
            ),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn info(&self, event: Event);
    fn warn(&self, event: Event);
    fn error(&self, event: Event);
}

/// Forwards events to the global `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn info(&self, event: Event) {
        tracing::info!(kind = event.kind(), "{event}");
    }

    fn warn(&self, event: Event) {
        tracing::warn!(kind = event.kind(), "{event}");
    }

    fn error(&self, event: Event) {
        tracing::error!(kind = event.kind(), "{event}");
    }
}

/// Records every event in memory.
#[derive(Debug, Default)]
pub struct CapturingSink {
    events: Mutex<Vec<(Severity, Event)>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Severity, Event)> {
        self.events.lock().clone()
    }

    /// Number of recorded events with the given kind name.
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|(_, event)| event.kind() == kind)
            .count()
    }

    pub fn find(&self, kind: &str) -> Option<(Severity, Event)> {
        self.events
            .lock()
            .iter()
            .find(|(_, event)| event.kind() == kind)
            .cloned()
    }

    fn push(&self, severity: Severity, event: Event) {
        self.events.lock().push((severity, event));
    }
}

impl EventSink for CapturingSink {
    fn info(&self, event: Event) {
        self.push(Severity::Info, event);
    }

    fn warn(&self, event: Event) {
        self.push(Severity::Warn, event);
    }

    fn error(&self, event: Event) {
        self.push(Severity::Error, event);
    }
}
