//! Window and stride sizes: percent-to-pixel resolution and the fit check
//! against the source image.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pixel dimensions of a decoded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub height: u32,
    pub width: u32,
}

/// A user-supplied window or stride, in pixels or in percent of the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub height: u32,
    pub width: u32,
    #[serde(default, alias = "percent")]
    pub is_percent: bool,
}

/// A [`SizeSpec`] converted to absolute pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedSize {
    pub height: u32,
    pub width: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeRole {
    Window,
    Stride,
}

impl ImageSize {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.height as usize * self.width as usize
    }

    /// Byte length of a tightly packed buffer with `channels` bytes per
    /// pixel, or `None` if it does not fit in `usize`.
    pub fn checked_byte_len(&self, channels: usize) -> Option<usize> {
        (self.height as usize)
            .checked_mul(self.width as usize)?
            .checked_mul(channels)
    }
}

impl SizeSpec {
    pub const fn pixels(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            is_percent: false,
        }
    }

    pub const fn percent(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            is_percent: true,
        }
    }

    /// Converts to pixels without validating. Percent values are truncated:
    /// `floor(dimension * value / 100)`.
    pub fn to_pixels(&self, image: ImageSize) -> ResolvedSize {
        if !self.is_percent {
            return ResolvedSize::new(self.height, self.width);
        }

        let scale = |dimension: u32, value: u32| -> u32 {
            let pixels = dimension as u64 * value as u64 / 100;
            pixels.min(u32::MAX as u64) as u32
        };

        ResolvedSize::new(
            scale(image.height, self.height),
            scale(image.width, self.width),
        )
    }
}

impl ResolvedSize {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// True when both sides are non-zero and strictly smaller than the image.
    pub fn fits_inside(&self, image: ImageSize) -> bool {
        self.height > 0
            && self.width > 0
            && self.height < image.height
            && self.width < image.width
    }
}

/// Resolves `spec` against `image` and checks that it fits strictly inside.
///
/// A size equal to the image dimension is rejected, as is a zero size (a
/// zero stride never advances).
pub fn resolve(image: ImageSize, spec: SizeSpec, role: SizeRole) -> Result<ResolvedSize> {
    let resolved = spec.to_pixels(image);
    if !resolved.fits_inside(image) {
        return Err(Error::Size {
            role,
            resolved,
            image,
        });
    }

    Ok(resolved)
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (h x w)", self.height, self.width)
    }
}

impl fmt::Display for ResolvedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (h x w)", self.height, self.width)
    }
}

impl fmt::Display for SizeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeRole::Window => write!(f, "Window"),
            SizeRole::Stride => write!(f, "Stride"),
        }
    }
}
