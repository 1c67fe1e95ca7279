use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zonegrid::{GeoPoint, Grid, JunctionStrategy, UtmPoint, ZoneDescriptor};

fn center() -> GeoPoint {
    UtmPoint::new(ZoneDescriptor::new(33, 'U').unwrap(), 497_000.0, 5_761_000.0).to_geo()
}

fn bench_utm_roundtrip(c: &mut Criterion) {
    let p = GeoPoint::new(52.52, 13.4);
    c.bench_function("utm_from_geo", |b| {
        b.iter(|| UtmPoint::from_geo(black_box(&p)).unwrap())
    });

    let utm = UtmPoint::from_geo(&p).unwrap();
    c.bench_function("utm_to_geo", |b| b.iter(|| black_box(&utm).to_geo()));
}

fn bench_point_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_buffer");
    for cells in [8u32, 32, 128] {
        for (name, strategy) in [
            ("extend", JunctionStrategy::Extend),
            ("multi_grid", JunctionStrategy::MultiGrid),
        ] {
            group.bench_with_input(BenchmarkId::new(name, cells), &cells, |b, &cells| {
                b.iter(|| {
                    let g = Grid::new();
                    g.set_spacing(1000.0);
                    g.set_junction_strategy(strategy);
                    g.place(center(), cells, cells);
                    black_box(g.point_buffer())
                });
            });
        }
    }
    group.finish();
}

fn bench_extent_alignment(c: &mut Criterion) {
    let tl = GeoPoint::new(52.52, 13.38);
    let br = GeoPoint::new(52.49, 13.43);
    c.bench_function("set_corners", |b| {
        let g = Grid::new();
        g.set_spacing(100.0);
        b.iter(|| g.set_corners(black_box(Some(tl)), black_box(Some(br))))
    });
}

criterion_group!(
    benches,
    bench_utm_roundtrip,
    bench_point_buffer,
    bench_extent_alignment
);
criterion_main!(benches);
