use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use diffgrowth_core::{Circle, Config, GrowthSimulator, Polyline, Rectangle, SpatialIndex};
use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

fn domain() -> Rectangle {
    Rectangle::new(Vec2::ZERO, Vec2::new(1000.0, 1000.0)).unwrap()
}

fn random_points(rng: &mut StdRng, n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|_| Vec2::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
        .collect()
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let points = random_points(&mut rng, 1000);

    c.bench_function("quadtree_insert_1000", |b| {
        b.iter_batched(
            || SpatialIndex::new(domain()),
            |mut index| {
                for id in 0..points.len() {
                    index.insert(black_box(id), &points).unwrap();
                }
                index
            },
            BatchSize::SmallInput,
        )
    });
}

fn circle_query_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let points = random_points(&mut rng, 5000);
    let mut index = SpatialIndex::new(domain());
    for id in 0..points.len() {
        index.insert(id, &points).unwrap();
    }

    c.bench_function("quadtree_circle_query", |b| {
        b.iter(|| {
            let center = Vec2::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0));
            let mut hits = 0usize;
            index.circle_query_with(&Circle::new(center, 20.0), &points, |_| hits += 1);
            black_box(hits)
        })
    });
}

fn redistribute_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let start = random_points(&mut rng, 2000);
    let moved: Vec<Vec2> = start
        .iter()
        .map(|p| {
            let step = Vec2::new(rng.random_range(-30.0..30.0), rng.random_range(-30.0..30.0));
            (*p + step).clamp(Vec2::ZERO, Vec2::splat(1000.0))
        })
        .collect();
    let mut index = SpatialIndex::new(domain());
    for id in 0..start.len() {
        index.insert(id, &start).unwrap();
    }

    c.bench_function("quadtree_redistribute_2000", |b| {
        b.iter_batched(
            || index.clone(),
            |mut index| {
                for (id, p) in moved.iter().enumerate() {
                    if !index.region_contains(id, *p) {
                        index.mark_dirty(id);
                    }
                }
                black_box(index.redistribute_dirty_points(&moved))
            },
            BatchSize::SmallInput,
        )
    });
}

fn growth_tick_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let seed = Polyline::jittered_circle_positions(Vec2::splat(500.0), 150.0, 400, 2.0, &mut rng);
    let sim = GrowthSimulator::new(seed, SpatialIndex::new(domain()), Config::default()).unwrap();

    c.bench_function("growth_tick_400_nodes", |b| {
        b.iter_batched(
            || sim.clone(),
            |mut sim| {
                sim.update(black_box(1.0 / 60.0)).unwrap();
                sim.split_long_edges().unwrap();
                sim
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    insert_benchmark,
    circle_query_benchmark,
    redistribute_benchmark,
    growth_tick_benchmark
);
criterion_main!(benches);
