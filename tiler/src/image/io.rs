use std::io::ErrorKind;
use std::path::Path;

use image as image_lib;
use image_lib::ImageError;

use super::Image;
use crate::error::{Error, Result};
use crate::size::ImageSize;

pub(crate) fn load(path: &Path) -> Result<Image> {
    let decoded = image_lib::open(path).map_err(|source| decode_error(path, source))?;
    let rgb = decoded.into_rgb8();
    let size = ImageSize::new(rgb.height(), rgb.width());

    Image::new_with_data(size, rgb.into_raw())
}

pub(crate) fn load_size(path: &Path) -> Result<ImageSize> {
    let (width, height) =
        image_lib::image_dimensions(path).map_err(|source| decode_error(path, source))?;

    Ok(ImageSize::new(height, width))
}

pub(crate) fn save(image: &Image, path: &Path) -> Result<()> {
    let encode_error = |source| Error::Encode {
        path: path.to_path_buf(),
        source,
    };

    let format = image_lib::ImageFormat::from_path(path).map_err(encode_error)?;

    image_lib::save_buffer_with_format(
        path,
        image.bytes(),
        image.width(),
        image.height(),
        image_lib::ColorType::Rgb8,
        format,
    )
    .map_err(encode_error)
}

fn decode_error(path: &Path, source: ImageError) -> Error {
    match source {
        ImageError::IoError(ref e) if e.kind() == ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        source => Error::Decode {
            path: path.to_path_buf(),
            source,
        },
    }
}
