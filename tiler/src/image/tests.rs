use common::test_utils::test_output_path;

use crate::error::Error;
use crate::image::{Image, TileFormat};
use crate::size::ImageSize;
use crate::test_utils::pattern_image;

// =============================================================================
// Buffer tests
// =============================================================================

#[test]
fn new_empty_is_black() {
    let img = Image::new_empty(ImageSize::new(4, 5));
    assert_eq!(img.width(), 5);
    assert_eq!(img.height(), 4);
    assert_eq!(img.bytes().len(), 4 * 5 * 3);
    assert!(img.bytes().iter().all(|&b| b == 0));
}

#[test]
fn try_new_empty_allocates_black_image() {
    let img = Image::try_new_empty(ImageSize::new(2, 3)).unwrap();
    assert_eq!(img, Image::new_empty(ImageSize::new(2, 3)));
}

#[test]
fn try_new_empty_rejects_overflowing_size() {
    let size = ImageSize::new(u32::MAX, u32::MAX);
    assert!(matches!(
        Image::try_new_empty(size),
        Err(Error::CanvasTooLarge { size: s }) if s == size
    ));
}

#[test]
fn new_with_data_checks_length() {
    let result = Image::new_with_data(ImageSize::new(2, 2), vec![0; 11]);
    assert!(matches!(
        result,
        Err(Error::BufferSize {
            expected: 12,
            actual: 11
        })
    ));
}

#[test]
fn set_get_pixel() {
    let mut img = Image::new_empty(ImageSize::new(3, 3));
    img.set_pixel(2, 1, [1, 2, 3]);
    assert_eq!(img.pixel(2, 1), [1, 2, 3]);
    assert_eq!(img.pixel(1, 2), [0, 0, 0]);
    assert_eq!(&img.row(1)[6..9], &[1, 2, 3]);
}

#[test]
fn crop_inside_copies_region() {
    let img = pattern_image(10, 12);
    let tile = img.crop(3, 2, 4, 5);
    assert_eq!(tile.size(), ImageSize::new(5, 4));
    for y in 0..5 {
        for x in 0..4 {
            assert_eq!(tile.pixel(x, y), img.pixel(x + 3, y + 2));
        }
    }
}

#[test]
fn crop_past_edge_is_clipped() {
    let img = pattern_image(10, 12);
    let tile = img.crop(9, 8, 5, 5);
    assert_eq!(tile.size(), ImageSize::new(2, 3));
    assert_eq!(tile.pixel(2, 1), img.pixel(11, 9));
}

#[test]
fn crop_outside_is_empty() {
    let img = pattern_image(4, 4);
    assert!(img.crop(4, 0, 2, 2).size().is_empty());
}

#[test]
fn blit_writes_at_offset() {
    let mut canvas = Image::new_empty(ImageSize::new(6, 6));
    let tile = pattern_image(2, 3);
    canvas.blit(&tile, 3, 4).unwrap();
    assert_eq!(canvas.pixel(3, 4), tile.pixel(0, 0));
    assert_eq!(canvas.pixel(5, 5), tile.pixel(2, 1));
    assert_eq!(canvas.pixel(2, 4), [0, 0, 0]);
}

#[test]
fn blit_out_of_bounds_writes_nothing() {
    let mut canvas = Image::new_empty(ImageSize::new(6, 6));
    let tile = pattern_image(3, 3);
    let result = canvas.blit(&tile, 4, 0);
    assert!(matches!(
        result,
        Err(Error::OutOfBounds { x: 4, y: 0, .. })
    ));
    assert!(canvas.bytes().iter().all(|&b| b == 0));
}

// =============================================================================
// File tests
// =============================================================================

#[test]
fn save_and_reload_png() {
    let original = pattern_image(17, 23);
    let path = test_output_path("tiler_save_reload.png");
    original.save_file(&path).unwrap();

    let reloaded = Image::read_file(&path).unwrap();
    assert_eq!(original, reloaded);
    assert_eq!(Image::read_size(&path).unwrap(), ImageSize::new(17, 23));
}

#[test]
fn save_and_reload_lossless_formats() {
    let dir = tempfile::TempDir::new().unwrap();
    let original = pattern_image(9, 14);
    for format in [TileFormat::Png, TileFormat::Tiff, TileFormat::Bmp] {
        let path = dir.path().join(format!("img.{}", format.extension()));
        original.save_file(&path).unwrap();
        assert_eq!(Image::read_file(&path).unwrap(), original, "{format}");
    }
}

#[test]
fn jpeg_keeps_dimensions() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("img.jpg");
    pattern_image(16, 16).save_file(&path).unwrap();
    assert_eq!(Image::read_file(&path).unwrap().size(), ImageSize::new(16, 16));
}

#[test]
fn read_missing_file_is_not_found() {
    let result = Image::read_file("/nonexistent/does_not_exist.png");
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn read_garbage_file_is_decode_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();
    assert!(matches!(Image::read_file(&path), Err(Error::Decode { .. })));
}

#[test]
fn save_unknown_extension_is_encode_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = pattern_image(2, 2).save_file(dir.path().join("img.xyz"));
    assert!(matches!(result, Err(Error::Encode { .. })));
}

#[test]
fn tile_format_parses_aliases() {
    assert_eq!("PNG".parse::<TileFormat>().unwrap(), TileFormat::Png);
    assert_eq!("jpeg".parse::<TileFormat>().unwrap(), TileFormat::Jpeg);
    assert_eq!("tif".parse::<TileFormat>().unwrap(), TileFormat::Tiff);
    assert!(matches!(
        "gif".parse::<TileFormat>(),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(TileFormat::Jpeg.is_lossy());
    assert!(!TileFormat::Png.is_lossy());
}
