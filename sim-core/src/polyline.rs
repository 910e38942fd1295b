use crate::{shapes::Located, types::NodeId};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct DifferentialNode {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    /// Fixed nodes are never moved by the simulator.
    pub fixed: bool,
}

impl DifferentialNode {
    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass,
            fixed: false,
        }
    }
}

impl Located for DifferentialNode {
    fn position(&self) -> Vec2 {
        self.position
    }
}

/// An ordered curve of [`DifferentialNode`]s, either closed or open.
///
/// Nodes live in an append-only arena so a [`NodeId`] never changes; the
/// traversal order is a separate list of ids. Both only grow.
#[derive(Debug, Clone)]
pub struct Polyline {
    pub nodes: Vec<DifferentialNode>,
    order: Vec<NodeId>,
    closed: bool,
}

impl Polyline {
    /// Creates a curve through `positions`, in that order.
    ///
    /// ### Parameters
    /// - `positions` - Initial node positions; node `i` gets id `i`.
    /// - `mass` - Mass of every node.
    /// - `closed` - Whether the last node connects back to the first.
    ///
    /// ### Returns
    /// A [`Polyline`] whose nodes are all at rest and not fixed.
    pub fn new(positions: impl IntoIterator<Item = Vec2>, mass: f32, closed: bool) -> Self {
        let nodes: Vec<DifferentialNode> = positions
            .into_iter()
            .map(|p| DifferentialNode::new(p, mass))
            .collect();
        let order = (0..nodes.len()).collect();
        Self {
            nodes,
            order,
            closed,
        }
    }

    /// Number of nodes on the curve.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Node ids in traversal order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Number of edges: `len` for a closed curve of at least two nodes,
    /// `len - 1` for an open one.
    pub fn edge_count(&self) -> usize {
        match (self.closed, self.order.len()) {
            (_, 0 | 1) => 0,
            (true, n) => n,
            (false, n) => n - 1,
        }
    }

    /// The two node ids joined by edge `edge`, or `None` if there is no
    /// such edge. Closed curves take `edge` modulo the length.
    pub fn edge(&self, edge: usize) -> Option<(NodeId, NodeId)> {
        let n = self.order.len();
        if self.edge_count() == 0 {
            return None;
        }
        if self.closed {
            let i = edge % n;
            Some((self.order[i], self.order[(i + 1) % n]))
        } else if edge + 1 < n {
            Some((self.order[edge], self.order[edge + 1]))
        } else {
            None
        }
    }

    /// The neighbours on the curve of the node at traversal index `i`.
    /// Open curves have no neighbour past either end.
    pub fn neighbors(&self, i: usize) -> [Option<NodeId>; 2] {
        let n = self.order.len();
        if n < 2 {
            return [None, None];
        }
        if self.closed {
            [
                Some(self.order[(i + n - 1) % n]),
                Some(self.order[(i + 1) % n]),
            ]
        } else {
            [
                i.checked_sub(1).map(|p| self.order[p]),
                self.order.get(i + 1).copied(),
            ]
        }
    }

    /// Appends `node` to the arena and splices it into the traversal order
    /// right after position `after`.
    ///
    /// ### Parameters
    /// - `after` - Traversal position to insert behind; past the end appends.
    /// - `node` - The new node.
    ///
    /// ### Returns
    /// The new node's id, which is the previous arena length.
    pub fn insert_after(&mut self, after: usize, node: DifferentialNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        let at = (after + 1).min(self.order.len());
        self.order.insert(at, id);
        id
    }

    /// Iterates nodes in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &DifferentialNode> + '_ {
        self.order.iter().map(|&id| &self.nodes[id])
    }

    /// `count` points evenly spaced on a circle, starting at angle zero.
    pub fn circle_positions(center: Vec2, radius: f32, count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|i| {
                let t = i as f32 / count as f32 * TAU;
                center + Vec2::new(t.cos(), t.sin()) * radius
            })
            .collect()
    }

    /// Like [`Polyline::circle_positions`] with each radius perturbed by up to
    /// `jitter` in either direction, which breaks the symmetry a perfect
    /// circle would otherwise keep forever.
    pub fn jittered_circle_positions(
        center: Vec2,
        radius: f32,
        count: usize,
        jitter: f32,
        rng: &mut impl Rng,
    ) -> Vec<Vec2> {
        (0..count)
            .map(|i| {
                let t = i as f32 / count as f32 * TAU;
                let r = if jitter > 0.0 {
                    radius + rng.random_range(-jitter..=jitter)
                } else {
                    radius
                };
                center + Vec2::new(t.cos(), t.sin()) * r
            })
            .collect()
    }

    /// `count` points evenly spaced from `from` to `to`, both included.
    pub fn line_positions(from: Vec2, to: Vec2, count: usize) -> Vec<Vec2> {
        match count {
            0 => Vec::new(),
            1 => vec![from],
            _ => (0..count)
                .map(|i| from.lerp(to, i as f32 / (count - 1) as f32))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn square(closed: bool) -> Polyline {
        Polyline::new(
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(0.0, 10.0),
            ],
            1.0,
            closed,
        )
    }

    #[test]
    fn edge_count_depends_on_closedness() {
        assert_eq!(square(true).edge_count(), 4);
        assert_eq!(square(false).edge_count(), 3);
        assert_eq!(Polyline::new([Vec2::ZERO], 1.0, true).edge_count(), 0);
        assert_eq!(Polyline::new(Vec::new(), 1.0, false).edge_count(), 0);
    }

    #[test]
    fn edges_wrap_only_when_closed() {
        let closed = square(true);
        assert_eq!(closed.edge(3), Some((3, 0)));
        assert_eq!(closed.edge(5), Some((1, 2)));

        let open = square(false);
        assert_eq!(open.edge(2), Some((2, 3)));
        assert_eq!(open.edge(3), None);
    }

    #[test]
    fn neighbors_at_the_ends() {
        let closed = square(true);
        assert_eq!(closed.neighbors(0), [Some(3), Some(1)]);
        assert_eq!(closed.neighbors(3), [Some(2), Some(0)]);

        let open = square(false);
        assert_eq!(open.neighbors(0), [None, Some(1)]);
        assert_eq!(open.neighbors(3), [Some(2), None]);
        assert_eq!(open.neighbors(1), [Some(0), Some(2)]);
    }

    #[test]
    fn insert_after_keeps_ids_stable() {
        let mut line = square(false);
        let id = line.insert_after(1, DifferentialNode::new(Vec2::new(10.0, 5.0), 1.0));
        assert_eq!(id, 4);
        assert_eq!(line.order(), &[0, 1, 4, 2, 3]);
        assert_eq!(line.nodes[2].position, Vec2::new(10.0, 10.0));
        assert_eq!(line.neighbors(2), [Some(1), Some(2)]);
    }

    #[test]
    fn iter_follows_traversal_order() {
        let mut line = square(true);
        line.insert_after(3, DifferentialNode::new(Vec2::new(0.0, 5.0), 1.0));
        let xs: Vec<Vec2> = line.iter().map(|n| n.position).collect();
        assert_eq!(xs.len(), 5);
        assert_eq!(xs[4], Vec2::new(0.0, 5.0));
    }

    #[test]
    fn seed_shapes() {
        let circle = Polyline::circle_positions(Vec2::new(50.0, 50.0), 10.0, 8);
        assert_eq!(circle.len(), 8);
        for p in &circle {
            assert!((p.distance(Vec2::new(50.0, 50.0)) - 10.0).abs() < 1e-4);
        }

        let line = Polyline::line_positions(Vec2::ZERO, Vec2::new(9.0, 0.0), 4);
        assert_eq!(line.len(), 4);
        for (p, x) in line.iter().zip([0.0, 3.0, 6.0, 9.0]) {
            assert!(p.abs_diff_eq(Vec2::new(x, 0.0), 1e-5), "{p:?} != ({x}, 0)");
        }
        assert!(Polyline::line_positions(Vec2::ZERO, Vec2::ONE, 0).is_empty());
    }

    #[test]
    fn jittered_circle_stays_within_jitter() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = Vec2::new(100.0, 100.0);
        let pts = Polyline::jittered_circle_positions(center, 30.0, 64, 2.0, &mut rng);
        assert_eq!(pts.len(), 64);
        for p in pts {
            let d = p.distance(center);
            assert!((28.0 - 1e-3..=32.0 + 1e-3).contains(&d));
        }
    }
}
