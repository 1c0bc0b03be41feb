//! Sliding-window split of one image into coordinate-named tiles.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::SplitConfig;
use crate::coords::{tile_file_name, TileCoordinate};
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::image::Image;
use crate::size::{resolve, ImageSize, ResolvedSize, SizeRole, SizeSpec};
use crate::timing::timed;

/// Validated window and stride for one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitPlan {
    pub image: ImageSize,
    pub window: ResolvedSize,
    pub stride: ResolvedSize,
}

/// One tile position with its extent after clipping to the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub coord: TileCoordinate,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct SplitReport {
    pub image: ImageSize,
    pub window: ResolvedSize,
    pub stride: ResolvedSize,
    /// Written tile files, in scan order.
    pub tiles: Vec<PathBuf>,
}

impl SplitPlan {
    /// Resolves window and stride against `image`. Fails with
    /// [`Error::Size`] if either does not fit strictly inside.
    pub fn new(image: ImageSize, window: SizeSpec, stride: SizeSpec) -> Result<Self> {
        let window = resolve(image, window, SizeRole::Window)?;
        let stride = resolve(image, stride, SizeRole::Stride)?;

        Ok(Self {
            image,
            window,
            stride,
        })
    }

    /// Tile origins, X in the outer loop and Y in the inner loop.
    pub fn coords(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        let xs = (0..self.image.width).step_by(self.stride.width as usize);
        xs.flat_map(move |x| {
            (0..self.image.height)
                .step_by(self.stride.height as usize)
                .map(move |y| TileCoordinate::new(x, y))
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = TileRect> + '_ {
        self.coords().map(move |coord| TileRect {
            coord,
            width: self.window.width.min(self.image.width - coord.x),
            height: self.window.height.min(self.image.height - coord.y),
        })
    }

    /// `ceil(width / stride_width) * ceil(height / stride_height)`
    pub fn tile_count(&self) -> usize {
        let columns = self.image.width.div_ceil(self.stride.width) as usize;
        let rows = self.image.height.div_ceil(self.stride.height) as usize;
        columns * rows
    }
}

impl SplitReport {
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

/// Splits an in-memory image. Tiles at the right and bottom edges are
/// cropped to the pixels available.
pub fn split(
    image: &Image,
    window: SizeSpec,
    stride: SizeSpec,
) -> Result<Vec<(TileCoordinate, Image)>> {
    let plan = SplitPlan::new(image.size(), window, stride)?;

    Ok(plan
        .rects()
        .map(|rect| {
            let tile = image.crop(rect.coord.x, rect.coord.y, rect.width, rect.height);
            (rect.coord, tile)
        })
        .collect())
}

/// Loads `image_path`, splits it and writes every tile into `output_dir`
/// as `<stem>_x<X>_y<Y>.<ext>`. No file is written if the image cannot be
/// read or the sizes are rejected.
pub fn split_file(
    image_path: &Path,
    output_dir: &Path,
    config: &SplitConfig,
    sink: &dyn EventSink,
) -> Result<SplitReport> {
    timed(sink, "split_image", || {
        split_file_impl(image_path, output_dir, config, sink)
    })
}

fn split_file_impl(
    image_path: &Path,
    output_dir: &Path,
    config: &SplitConfig,
    sink: &dyn EventSink,
) -> Result<SplitReport> {
    let image = Image::read_file(image_path).inspect_err(|err| {
        if matches!(err, Error::NotFound { .. } | Error::Decode { .. }) {
            sink.error(Event::NoImage {
                path: image_path.to_path_buf(),
            });
        }
    })?;

    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    sink.info(Event::ImageLoaded { size: image.size() });

    let plan = SplitPlan::new(image.size(), config.window, config.stride).inspect_err(|err| {
        if let Error::Size {
            role,
            resolved,
            image,
        } = err
        {
            sink.error(Event::SizeError {
                role: *role,
                resolved: *resolved,
                image: *image,
            });
        }
    })?;

    if config.window.is_percent {
        sink.info(Event::PercentWindow);
    }
    sink.info(Event::WindowSize { size: plan.window });
    if config.stride.is_percent {
        sink.info(Event::PercentStride);
    }
    sink.info(Event::StrideSize { size: plan.stride });

    std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let extension = config.format.extension();
    let rects: Vec<TileRect> = plan.rects().collect();
    let tiles = rects
        .into_par_iter()
        .map(|rect| {
            let tile = image.crop(rect.coord.x, rect.coord.y, rect.width, rect.height);
            let path = output_dir.join(tile_file_name(&stem, rect.coord, extension));
            tile.save_file(&path)?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    sink.info(Event::SplitFinished { count: tiles.len() });

    Ok(SplitReport {
        image: plan.image,
        window: plan.window,
        stride: plan.stride,
        tiles,
    })
}
