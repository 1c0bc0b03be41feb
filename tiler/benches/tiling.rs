//! Benchmark for split planning, in-memory split and canvas placement.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tiler::{split, Image, ImageSize, SizeSpec, SplitPlan};

fn pattern(height: u32, width: u32) -> Image {
    let bytes = (0..height as usize * width as usize * 3)
        .map(|i| (i % 251) as u8)
        .collect();
    Image::new_with_data(ImageSize::new(height, width), bytes).unwrap()
}

fn benchmarks(c: &mut Criterion) {
    let image = pattern(1024, 1536);
    let window = SizeSpec::pixels(256, 256);
    let stride = SizeSpec::pixels(192, 192);

    c.bench_function("plan_2048x2048_stride_8", |b| {
        b.iter(|| {
            let plan = SplitPlan::new(
                ImageSize::new(2048, 2048),
                SizeSpec::pixels(16, 16),
                SizeSpec::pixels(8, 8),
            )
            .unwrap();
            black_box(plan.rects().count())
        })
    });

    c.bench_function("split_1536x1024", |b| {
        b.iter(|| black_box(split(black_box(&image), window, stride).unwrap()))
    });

    let tiles = split(&image, window, stride).unwrap();
    c.bench_function("place_1536x1024", |b| {
        b.iter(|| {
            let mut canvas = Image::new_empty(image.size());
            for (coord, tile) in &tiles {
                canvas.blit(tile, coord.x, coord.y).unwrap();
            }
            black_box(canvas)
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
