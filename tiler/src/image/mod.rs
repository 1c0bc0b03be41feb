mod io;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::size::ImageSize;

/// Interleaved RGB, one byte per channel.
pub const CHANNELS: usize = 3;

/// A 3-channel 8-bit pixel buffer, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    size: ImageSize,
    bytes: Vec<u8>,
}

/// Encoding used for tile files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    #[serde(alias = "tif")]
    Tiff,
    Bmp,
}

impl Image {
    /// Allocates a zero-filled (black) image.
    pub fn new_empty(size: ImageSize) -> Image {
        Image {
            size,
            bytes: vec![0; size.pixel_count() * CHANNELS],
        }
    }

    /// Like [`Image::new_empty`], but sizes derived from untrusted input
    /// (tile coordinates) return [`Error::CanvasTooLarge`] instead of
    /// overflowing or aborting on allocation failure.
    pub fn try_new_empty(size: ImageSize) -> Result<Image> {
        let too_large = || Error::CanvasTooLarge { size };
        let len = size.checked_byte_len(CHANNELS).ok_or_else(too_large)?;

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| too_large())?;
        bytes.resize(len, 0);

        Ok(Image { size, bytes })
    }

    pub fn new_with_data(size: ImageSize, bytes: Vec<u8>) -> Result<Image> {
        let expected = size.pixel_count() * CHANNELS;
        if bytes.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Image { size, bytes })
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Returns the number of bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.size.width as usize * CHANNELS
    }

    /// # Panics
    /// Panics if `y` is outside the image.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.row_bytes();
        &self.bytes[start..start + self.row_bytes()]
    }

    /// # Panics
    /// Panics if the position is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.bytes[i], self.bytes[i + 1], self.bytes[i + 2]]
    }

    /// # Panics
    /// Panics if the position is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.bytes[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.size.width && y < self.size.height,
            "pixel ({x}, {y}) outside image {}",
            self.size
        );
        (y as usize * self.size.width as usize + x as usize) * CHANNELS
    }

    /// Copies the rectangle starting at (`x`, `y`). Parts of the rectangle
    /// past the right or bottom edge are dropped, so the result may be
    /// smaller than requested; it is empty when the origin is outside.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Image {
        if x >= self.size.width || y >= self.size.height {
            return Image::new_empty(ImageSize::default());
        }

        let x_end = x.saturating_add(width).min(self.size.width);
        let y_end = y.saturating_add(height).min(self.size.height);
        let size = ImageSize::new(y_end - y, x_end - x);

        let span = size.width as usize * CHANNELS;
        let mut bytes = Vec::with_capacity(size.pixel_count() * CHANNELS);
        for row in y..y_end {
            let start = self.offset(x, row);
            bytes.extend_from_slice(&self.bytes[start..start + span]);
        }

        Image { size, bytes }
    }

    /// Writes `tile` with its top-left corner at (`x`, `y`). Nothing is
    /// written unless the whole tile fits.
    pub fn blit(&mut self, tile: &Image, x: u32, y: u32) -> Result<()> {
        let fits = x as u64 + tile.width() as u64 <= self.size.width as u64
            && y as u64 + tile.height() as u64 <= self.size.height as u64;
        if !fits {
            return Err(Error::OutOfBounds {
                x,
                y,
                tile: tile.size,
                canvas: self.size,
            });
        }
        if tile.size.is_empty() {
            return Ok(());
        }

        let span = tile.row_bytes();
        for row in 0..tile.height() {
            let start = self.offset(x, y + row);
            self.bytes[start..start + span].copy_from_slice(tile.row(row));
        }

        Ok(())
    }

    /// Decodes any supported file and converts it to RGB8.
    pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Image> {
        io::load(filename.as_ref())
    }

    /// Reads the dimensions from the file header without decoding pixels.
    pub fn read_size<P: AsRef<Path>>(filename: P) -> Result<ImageSize> {
        io::load_size(filename.as_ref())
    }

    /// Encodes the image in the format implied by the file extension.
    pub fn save_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        io::save(self, filename.as_ref())
    }
}

impl TileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
            TileFormat::Tiff => "tiff",
            TileFormat::Bmp => "bmp",
        }
    }

    /// Lossy formats do not survive a split/merge round trip unchanged.
    pub fn is_lossy(&self) -> bool {
        matches!(self, TileFormat::Jpeg)
    }
}

impl FromStr for TileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            "tif" | "tiff" => Ok(TileFormat::Tiff),
            "bmp" => Ok(TileFormat::Bmp),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
