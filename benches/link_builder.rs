//! Benchmarks for the CPU side of a field tick.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linkfield::{build_links, step, FieldConfig, SceneState, SpawnContext};

fn config(count: usize) -> FieldConfig {
    FieldConfig::new()
        .with_particle_count(count)
        .with_radius_range(1.0, 3.0)
        .with_link_threshold(0.9)
        .with_max_links(usize::MAX)
        .with_seed(1)
}

fn bench_build_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_links");

    for count in [50usize, 100, 200, 400] {
        let config = config(count);
        let positions = SceneState::new(&config, &mut SpawnContext::seeded(1)).positions();
        group.bench_with_input(BenchmarkId::from_parameter(count), &positions, |b, positions| {
            b.iter(|| black_box(build_links(black_box(positions), 0.9)))
        });
    }

    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for rebuild in [1u64, 5] {
        let config = config(150).with_rebuild_every(rebuild);
        let initial = SceneState::new(&config, &mut SpawnContext::seeded(2));
        let id = BenchmarkId::new("five_ticks_rebuild_every", rebuild);
        group.bench_with_input(id, &config, |b, config| {
            b.iter_batched(
                || initial.clone(),
                |mut state| {
                    // Five ticks covers one full rebuild cycle at the default cadence.
                    for _ in 0..5 {
                        state = step(state, config, 1.0);
                    }
                    black_box(state)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_links, bench_step);
criterion_main!(benches);
