//! Generation benchmarks for mapgen_core.
//!
//! Run with: `cargo bench -p mapgen_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mapgen_core::generator::RandomMapGenerator;
use mapgen_core::random::{MapStyle, RandomConfig};
use mapgen_core::settings::MapSettings;
use mapgen_core::vertex::MapExtent;

/// Full generation at several map sizes.
pub fn generation_benchmark(c: &mut Criterion) {
    let generator = RandomMapGenerator::with_default_terrain(RandomConfig::new(MapStyle::Mixed, 7));
    let mut group = c.benchmark_group("create");
    for side in [32u16, 64, 128] {
        let settings = MapSettings {
            size: MapExtent::new(side, side),
            players: 4,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(side), &settings, |b, s| {
            b.iter(|| black_box(generator.create(black_box(s))));
        });
    }
    group.finish();
}

/// Water maps run the harbor pass over long coasts.
pub fn water_benchmark(c: &mut Criterion) {
    let generator = RandomMapGenerator::with_default_terrain(RandomConfig::new(MapStyle::Water, 7));
    let settings = MapSettings::default();
    c.bench_function("create_water_64", |b| {
        b.iter(|| black_box(generator.create(black_box(&settings))));
    });
}

criterion_group!(benches, generation_benchmark, water_benchmark);
criterion_main!(benches);
