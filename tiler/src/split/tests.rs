use std::path::Path;

use tempfile::TempDir;

use crate::config::SplitConfig;
use crate::coords::{parse_coords, TileCoordinate};
use crate::error::Error;
use crate::events::{CapturingSink, Event, Severity};
use crate::image::{Image, TileFormat};
use crate::size::{ImageSize, ResolvedSize, SizeRole, SizeSpec};
use crate::test_utils::{pattern_image, write_pattern_image};

use super::*;

fn config(window: SizeSpec, stride: SizeSpec) -> SplitConfig {
    SplitConfig {
        window,
        stride,
        format: TileFormat::Png,
    }
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Planning
// =============================================================================

#[test]
fn plan_scans_x_outer_y_inner() {
    let plan = SplitPlan::new(
        ImageSize::new(100, 100),
        SizeSpec::pixels(50, 50),
        SizeSpec::pixels(50, 50),
    )
    .unwrap();

    let coords: Vec<_> = plan.coords().collect();
    assert_eq!(
        coords,
        [
            TileCoordinate::new(0, 0),
            TileCoordinate::new(0, 50),
            TileCoordinate::new(50, 0),
            TileCoordinate::new(50, 50),
        ]
    );
    assert_eq!(plan.tile_count(), 4);
}

#[test]
fn tile_count_includes_partial_steps() {
    let plan = SplitPlan::new(
        ImageSize::new(101, 70),
        SizeSpec::pixels(40, 40),
        SizeSpec::pixels(30, 20),
    )
    .unwrap();
    // ceil(70 / 20) = 4 columns, ceil(101 / 30) = 4 rows.
    assert_eq!(plan.tile_count(), 16);
    assert_eq!(plan.coords().count(), 16);
}

#[test]
fn rects_are_clipped_at_edges() {
    let plan = SplitPlan::new(
        ImageSize::new(10, 10),
        SizeSpec::pixels(6, 6),
        SizeSpec::pixels(4, 4),
    )
    .unwrap();

    let last = plan.rects().last().unwrap();
    assert_eq!(last.coord, TileCoordinate::new(8, 8));
    assert_eq!((last.width, last.height), (2, 2));
}

#[test]
fn plan_resolves_percent_sizes() {
    let plan = SplitPlan::new(
        ImageSize::new(200, 100),
        SizeSpec::percent(50, 10),
        SizeSpec::percent(25, 10),
    )
    .unwrap();
    assert_eq!(plan.window, ResolvedSize::new(100, 10));
    assert_eq!(plan.stride, ResolvedSize::new(50, 10));
    assert_eq!(plan.tile_count(), 40);
}

#[test]
fn plan_rejects_window_equal_to_image() {
    let result = SplitPlan::new(
        ImageSize::new(100, 100),
        SizeSpec::pixels(100, 100),
        SizeSpec::pixels(10, 10),
    );
    assert!(matches!(
        result,
        Err(Error::Size {
            role: SizeRole::Window,
            ..
        })
    ));
}

#[test]
fn stride_larger_than_window_is_allowed() {
    let plan = SplitPlan::new(
        ImageSize::new(100, 100),
        SizeSpec::pixels(10, 10),
        SizeSpec::pixels(30, 30),
    )
    .unwrap();
    assert_eq!(plan.tile_count(), 16);
}

// =============================================================================
// In-memory split
// =============================================================================

#[test]
fn split_tiles_match_source_pixels() {
    let image = pattern_image(30, 40);
    let tiles = split(&image, SizeSpec::pixels(12, 16), SizeSpec::pixels(10, 10)).unwrap();
    assert_eq!(tiles.len(), 12);

    for (coord, tile) in &tiles {
        for y in 0..tile.height() {
            for x in 0..tile.width() {
                assert_eq!(tile.pixel(x, y), image.pixel(coord.x + x, coord.y + y));
            }
        }
    }

    let (coord, edge) = tiles.last().unwrap();
    assert_eq!(*coord, TileCoordinate::new(30, 20));
    assert_eq!(edge.size(), ImageSize::new(10, 10));
}

// =============================================================================
// File split
// =============================================================================

#[test]
fn split_file_writes_named_tiles() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("photo.png");
    write_pattern_image(&source, 100, 100);
    let out = dir.path().join("tiles");

    let sink = CapturingSink::new();
    let report = split_file(
        &source,
        &out,
        &config(SizeSpec::pixels(50, 50), SizeSpec::pixels(50, 50)),
        &sink,
    )
    .unwrap();

    assert_eq!(report.tile_count(), 4);
    assert_eq!(
        names_in(&out),
        [
            "photo_x0_y0.png",
            "photo_x0_y50.png",
            "photo_x50_y0.png",
            "photo_x50_y50.png"
        ]
    );
    for path in &report.tiles {
        let tile = Image::read_file(path).unwrap();
        assert_eq!(tile.size(), ImageSize::new(50, 50));
        parse_coords(path).unwrap();
    }

    assert!(sink
        .events()
        .contains(&(Severity::Info, Event::SplitFinished { count: 4 })));
    assert_eq!(sink.count("runtime"), 1);
    assert_eq!(sink.count("percent_window"), 0);
}

#[test]
fn split_file_reports_percent_usage() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("img.png");
    write_pattern_image(&source, 40, 40);

    let sink = CapturingSink::new();
    split_file(
        &source,
        &dir.path().join("out"),
        &config(SizeSpec::percent(50, 50), SizeSpec::percent(25, 25)),
        &sink,
    )
    .unwrap();

    assert_eq!(sink.count("percent_window"), 1);
    assert_eq!(sink.count("percent_stride"), 1);
    assert_eq!(
        sink.find("window_size").map(|(_, e)| e),
        Some(Event::WindowSize {
            size: ResolvedSize::new(20, 20)
        })
    );
}

#[test]
fn missing_image_reports_no_image_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let sink = CapturingSink::new();

    let result = split_file(
        &dir.path().join("absent.png"),
        &out,
        &SplitConfig::default(),
        &sink,
    );

    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert!(matches!(sink.find("no_image"), Some((Severity::Error, _))));
    assert!(!out.exists());
}

#[test]
fn undecodable_image_reports_no_image_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("broken.png");
    std::fs::write(&source, b"\x89PNG but not really").unwrap();
    let out = dir.path().join("out");
    let sink = CapturingSink::new();

    let result = split_file(&source, &out, &SplitConfig::default(), &sink);

    assert!(matches!(result, Err(Error::Decode { path, .. }) if path == source));
    assert!(matches!(sink.find("no_image"), Some((Severity::Error, _))));
    assert_eq!(sink.count("image_loaded"), 0);
    assert!(!out.exists());
}

#[test]
fn oversized_stride_reports_size_error_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("img.png");
    write_pattern_image(&source, 20, 20);
    let out = dir.path().join("out");
    let sink = CapturingSink::new();

    let result = split_file(
        &source,
        &out,
        &config(SizeSpec::pixels(10, 10), SizeSpec::pixels(5, 20)),
        &sink,
    );

    assert!(matches!(
        result,
        Err(Error::Size {
            role: SizeRole::Stride,
            ..
        })
    ));
    assert_eq!(sink.count("size_error"), 1);
    assert_eq!(sink.count("finished"), 0);
    assert!(!out.exists());
}

#[test]
fn split_file_uses_configured_format() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("scan.png");
    write_pattern_image(&source, 20, 20);
    let out = dir.path().join("out");

    let report = split_file(
        &source,
        &out,
        &SplitConfig {
            window: SizeSpec::pixels(10, 10),
            stride: SizeSpec::pixels(10, 10),
            format: TileFormat::Bmp,
        },
        &CapturingSink::new(),
    )
    .unwrap();

    assert_eq!(report.tile_count(), 4);
    assert!(names_in(&out).iter().all(|n| n.ends_with(".bmp")));
}
