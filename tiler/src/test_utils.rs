use std::path::Path;

use crate::image::Image;
use crate::size::ImageSize;

/// Deterministic RGB pattern where neighbouring pixels differ.
pub fn pattern_image(height: u32, width: u32) -> Image {
    let mut image = Image::new_empty(ImageSize::new(height, width));
    for y in 0..height {
        for x in 0..width {
            image.set_pixel(
                x,
                y,
                [
                    (x % 251) as u8,
                    (y % 241) as u8,
                    ((x * 7 + y * 13) % 256) as u8,
                ],
            );
        }
    }
    image
}

/// Writes a pattern image and returns it for later comparison.
pub fn write_pattern_image(path: &Path, height: u32, width: u32) -> Image {
    let image = pattern_image(height, width);
    image.save_file(path).unwrap();
    image
}
