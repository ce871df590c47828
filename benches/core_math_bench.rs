use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use indexmap::IndexSet;
use storymap::api::{ModeProfile, Palette, RenderingSurface, StepEncoder, StoryConfig};
use storymap::core::{GeoCoord, MercatorProjection, PathGenerator, Viewport, fit_regions};
use storymap::data::{PointFeature, Region};
use storymap::render::NullRenderer;

fn grid_regions(columns: usize, rows: usize) -> Vec<Region> {
    (0..columns * rows)
        .map(|i| {
            let lon = -5.0 + (i % columns) as f64 * 0.1;
            let lat = 51.0 + (i / columns) as f64 * 0.1;
            let ring = vec![
                GeoCoord::new(lon, lat),
                GeoCoord::new(lon + 0.1, lat),
                GeoCoord::new(lon + 0.1, lat + 0.1),
                GeoCoord::new(lon, lat + 0.1),
                GeoCoord::new(lon, lat),
            ];
            Region::polygon(format!("region-{i}"), ring).expect("valid region")
        })
        .collect()
}

fn bench_fit_regions_400(c: &mut Criterion) {
    let regions = grid_regions(20, 20);
    let projection = MercatorProjection::fitted(&regions, 1280.0, 695.0).expect("fit");
    let selector: IndexSet<String> = (0..400)
        .step_by(3)
        .map(|i| format!("region-{i}"))
        .collect();

    c.bench_function("fit_regions_400", |b| {
        b.iter(|| {
            let _ = fit_regions(
                black_box(&regions),
                black_box(&selector),
                PathGenerator::new(projection),
                black_box(1280.0),
                black_box(720.0),
                black_box(80.0),
            );
        })
    });
}

fn bench_surface_frame_10k_markers(c: &mut Criterion) {
    let regions: Arc<[Region]> = grid_regions(20, 20).into();
    let points: Vec<PointFeature> = (0..10_000)
        .map(|i| {
            let t = i as f64 / 10_000.0;
            PointFeature::at(-5.0 + 2.0 * t, 51.0 + 2.0 * (1.0 - t))
                .with_category(if i % 3 == 0 { "C" } else { "D" })
        })
        .collect();
    let config = StoryConfig::default();
    let mut surface = RenderingSurface::initialize(
        regions,
        &points,
        Viewport::new(1280, 720),
        ModeProfile::desktop(),
        Palette::default(),
    )
    .expect("surface");
    for update in &StepEncoder::new(&config).encode(2) {
        surface.apply_update(update, &config.area_of_interest, 0.0);
    }

    c.bench_function("surface_frame_10k_markers_mid_transition", |b| {
        let mut renderer = NullRenderer::default();
        b.iter(|| {
            surface
                .render(&mut renderer, black_box(750.0))
                .expect("render should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_fit_regions_400,
    bench_surface_frame_10k_markers
);
criterion_main!(benches);
