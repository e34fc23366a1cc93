//! Benchmarks for the layout pipeline.
//!
//! Measures placeable area computation and full optimization at various
//! building sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use floorplan_layout::{
    BuildingGeometry, EngineConfig, Optimizer, Polygon, Segment, ZoneCalculator,
};

fn building(size: f64) -> BuildingGeometry {
    BuildingGeometry::rectangle(size, size * 0.75)
        .with_wall(Segment::from_coords(size * 0.5, 0.0, size * 0.5, size * 0.5))
        .with_wall(Segment::from_coords(0.0, size * 0.4, size * 0.3, size * 0.4))
        .with_restricted_zone(Polygon::rectangle(size * 0.8, 0.0, size, size * 0.2))
        .with_entrance_zone(Polygon::rectangle(0.0, 0.0, 3.0, 3.0))
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    group.sample_size(10);

    for &size in &[20.0, 40.0, 80.0] {
        let geometry = building(size);
        let optimizer = Optimizer::new(EngineConfig::default().with_seed(42));

        group.bench_with_input(
            BenchmarkId::new("profile_30", size as u32),
            &(geometry, optimizer),
            |b, (g, o)| {
                b.iter(|| {
                    let outcome = o.optimize(black_box(g), None, 1.5, "30%");
                    black_box(outcome)
                })
            },
        );
    }
    group.finish();
}

fn bench_placeable_area(c: &mut Criterion) {
    let geometry = building(40.0);
    let zones = ZoneCalculator::new(&EngineConfig::default());
    c.bench_function("placeable_area_40m", |b| {
        b.iter(|| zones.compute_placeable_area(black_box(&geometry)))
    });
}

criterion_group!(benches, bench_optimize, bench_placeable_area);
criterion_main!(benches);
