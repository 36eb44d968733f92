//! Criterion benches for roadmap planning.
//!
//! - Open world at two sample counts.
//! - A wall with a single gap, which forces longer paths and some regrowth.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use flocksim::geom::Polygon;
use flocksim::obstacle::{Obstacle, ObstacleSet};
use flocksim::planner::Prm;
use flocksim::SimConfig;
use nalgebra::vector;
use rand::{rngs::StdRng, SeedableRng};

fn gap_wall() -> ObstacleSet {
    ObstacleSet::new(vec![
        Obstacle::fixed(Polygon::rect(vector![480.0, 0.0], vector![520.0, 260.0])),
        Obstacle::fixed(Polygon::rect(vector![480.0, 340.0], vector![520.0, 600.0])),
    ])
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("prm");
    for samples in [100usize, 300] {
        let mut cfg = SimConfig::default();
        cfg.planner.sample_count = samples;
        group.bench_function(BenchmarkId::new("open", samples), |b| {
            b.iter_batched(
                || StdRng::seed_from_u64(7),
                |mut rng| {
                    let mut prm = Prm::new(vector![50.0, 50.0], vector![950.0, 30.0], &cfg);
                    let _ = prm.plan(&ObstacleSet::default(), &mut rng);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let cfg = SimConfig::default();
    let walls = gap_wall();
    group.bench_function(BenchmarkId::new("gap_wall", cfg.planner.sample_count), |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(11),
            |mut rng| {
                let mut prm = Prm::new(vector![60.0, 300.0], vector![940.0, 300.0], &cfg);
                let _ = prm.plan(&walls, &mut rng);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
