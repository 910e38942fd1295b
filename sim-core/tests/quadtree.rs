use diffgrowth_core::{Circle, QuadtreeConfig, Rectangle, SpatialIndex};
use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn domain() -> Rectangle {
    Rectangle::new(Vec2::ZERO, Vec2::new(500.0, 700.0)).unwrap()
}

fn random_point(rng: &mut StdRng) -> Vec2 {
    Vec2::new(rng.random_range(0.0..=500.0), rng.random_range(0.0..=700.0))
}

fn brute_force(points: &[Vec2], circle: &Circle) -> Vec<usize> {
    (0..points.len())
        .filter(|&id| circle.contains_point(points[id]))
        .collect()
}

fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
    ids.sort_unstable();
    ids
}

fn filled_index(rng: &mut StdRng, n: usize) -> (SpatialIndex, Vec<Vec2>) {
    let points: Vec<Vec2> = (0..n).map(|_| random_point(rng)).collect();
    let mut index = SpatialIndex::new(domain());
    for id in 0..n {
        index.insert(id, &points).unwrap();
    }
    (index, points)
}

#[test]
fn circle_query_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(11);
    let (index, points) = filled_index(&mut rng, 2000);
    assert_eq!(index.len(), 2000);
    assert!(index.region_count() > 1);
    assert_eq!(index.validate(&points), Ok(()));

    for _ in 0..200 {
        let circle = Circle::new(random_point(&mut rng), rng.random_range(0.0..80.0));
        assert_eq!(
            sorted(index.circle_query(&circle, &points)),
            brute_force(&points, &circle),
            "query {circle:?}"
        );
    }
}

#[test]
fn queries_stay_exact_while_points_are_dirty() {
    let mut rng = StdRng::seed_from_u64(12);
    let (mut index, mut points) = filled_index(&mut rng, 1000);
    let bounds = index.bounds();

    for round in 0..20 {
        for (id, p) in points.iter_mut().enumerate() {
            let step = Vec2::new(rng.random_range(-25.0..25.0), rng.random_range(-25.0..25.0));
            *p = bounds.clamp_point(*p + step);
            if !index.region_contains(id, *p) {
                index.mark_dirty(id);
            }
        }

        for _ in 0..20 {
            let circle = Circle::new(random_point(&mut rng), rng.random_range(1.0..60.0));
            assert_eq!(
                sorted(index.circle_query(&circle, &points)),
                brute_force(&points, &circle),
                "round {round}, query {circle:?} before redistribution"
            );
        }

        assert!(index.redistribute_dirty_points(&points).is_empty());
        assert_eq!(index.dirty_count(), 0);
        assert_eq!(index.validate(&points), Ok(()), "round {round}");
    }
}

#[test]
fn coincident_points_stop_at_max_depth() {
    let config = QuadtreeConfig {
        capacity: 1,
        max_depth: 5,
    };
    let mut index = SpatialIndex::with_config(domain(), config).unwrap();
    let points = vec![Vec2::new(123.0, 456.0); 100];
    for id in 0..points.len() {
        index.insert(id, &points).unwrap();
    }

    assert!(index.region_count() <= 1 + 4 * 5);
    assert_eq!(index.validate(&points), Ok(()));
    let hits = index.circle_query(&Circle::new(Vec2::new(123.0, 456.0), 0.5), &points);
    assert_eq!(hits.len(), 100);
}

#[test]
fn strays_stay_registered_and_queryable() {
    let mut rng = StdRng::seed_from_u64(13);
    let (mut index, mut points) = filled_index(&mut rng, 50);

    points[7] = Vec2::new(-40.0, 10.0);
    index.mark_dirty(7);
    assert_eq!(index.redistribute_dirty_points(&points), vec![7]);
    assert_eq!(index.dirty_count(), 1);
    assert!(index.region_of(7).is_some());

    let hits = index.circle_query(&Circle::new(Vec2::new(-40.0, 10.0), 1.0), &points);
    assert_eq!(hits, vec![7]);

    points[7] = Vec2::new(10.0, 10.0);
    assert!(index.redistribute_dirty_points(&points).is_empty());
    assert_eq!(index.dirty_count(), 0);
    assert_eq!(index.validate(&points), Ok(()));
}
