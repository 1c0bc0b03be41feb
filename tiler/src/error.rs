use std::path::PathBuf;

use thiserror::Error;

use crate::size::{ImageSize, ResolvedSize, SizeRole};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Can't find the image in the path: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to decode image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{role} size {resolved} does not fit inside image {image}")]
    Size {
        role: SizeRole,
        resolved: ResolvedSize,
        image: ImageSize,
    },

    #[error("No tile coordinates in file name: {name}")]
    Parse { name: String },

    #[error("Tile {tile} at x={x}, y={y} does not fit canvas {canvas}")]
    OutOfBounds {
        x: u32,
        y: u32,
        tile: ImageSize,
        canvas: ImageSize,
    },

    #[error("Buffer length {actual} does not match expected size {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("No tiles to merge")]
    EmptyGrid,

    #[error("Canvas {size} is too large to allocate")]
    CanvasTooLarge { size: ImageSize },

    #[error("IO error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to load config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: common::file_format::LoadError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
