use crate::types::NodeId;
use glam::Vec2;

/// Per-node scratch space for one simulation tick.
///
/// For each `NodeId`, this buffer stores:
///
/// - The sum of unit vectors pointing away from nearby nodes, and how many
///   were added, so the **mean** repulsion direction can be recovered.
/// - The accumulated steering force from every phase.
///
/// The simulator resizes and clears it at the start of every tick, then
/// every phase adds into it; nothing survives from the previous tick.
#[derive(Debug, Clone, Default)]
pub struct SteeringBuffer {
    /// Summed away-directions for each node.
    away: Vec<Vec2>,
    /// Number of neighbours that contributed to `away`.
    pub count: Vec<u32>,
    /// Net steering force for each node.
    force: Vec<Vec2>,
}

impl SteeringBuffer {
    /// Creates a new [`SteeringBuffer`] with every entry zeroed.
    ///
    /// ### Parameters
    /// - `len` - Number of nodes this buffer can hold forces for.
    ///
    /// ### Returns
    /// A new [`SteeringBuffer`] of length `len`.
    pub fn with_len(len: usize) -> Self {
        Self {
            away: vec![Vec2::ZERO; len],
            count: vec![0; len],
            force: vec![Vec2::ZERO; len],
        }
    }

    /// Number of node slots.
    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Resizes to `len` entries and zeroes all of them, even if the length
    /// was already right.
    ///
    /// ### Parameters
    /// - `len` - Desired number of node slots.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.away.resize(len, Vec2::ZERO);
            self.count.resize(len, 0);
            self.force.resize(len, Vec2::ZERO);
        }
        self.clear();
    }

    /// Zeroes every entry without changing the length.
    pub fn clear(&mut self) {
        self.away.fill(Vec2::ZERO);
        self.count.fill(0);
        self.force.fill(Vec2::ZERO);
    }

    /// Records one neighbour of `id`.
    ///
    /// ### Parameters
    /// - `id` - Node ID being pushed (used as an index).
    /// - `dir` - Unit vector pointing from the neighbour to the node.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add_away(&mut self, id: NodeId, dir: Vec2) {
        self.away[id] += dir;
        self.count[id] += 1;
    }

    /// Mean away-direction for `id`.
    ///
    /// ### Parameters
    /// - `id` - Node ID to query.
    ///
    /// ### Returns
    /// The average of every vector passed to [`SteeringBuffer::add_away`],
    /// or `Vec2::ZERO` when none was recorded.
    #[inline]
    pub fn mean_away(&self, id: NodeId) -> Vec2 {
        let c = self.count[id];
        if c == 0 {
            Vec2::ZERO
        } else {
            self.away[id] / (c as f32)
        }
    }

    /// Adds a weighted steering force to the node's net force.
    ///
    /// ### Parameters
    /// - `id` - Node ID the force acts on.
    /// - `force` - Force to add.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add_force(&mut self, id: NodeId, force: Vec2) {
        self.force[id] += force;
    }

    /// Net force accumulated for `id` so far this tick.
    #[inline]
    pub fn force(&self, id: NodeId) -> Vec2 {
        self.force[id]
    }

    /// Ids that recorded at least one neighbour.
    pub fn crowded_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.count
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| if c > 0 { Some(i) } else { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_len_initializes_zeroed_state() {
        let buf = SteeringBuffer::with_len(5);
        assert_eq!(buf.len(), 5);
        for id in 0..5 {
            assert_eq!(buf.force(id), Vec2::ZERO);
            assert_eq!(buf.mean_away(id), Vec2::ZERO);
            assert_eq!(buf.count[id], 0);
        }
    }

    #[test]
    fn ensure_len_clears_when_same_length() {
        let mut buf = SteeringBuffer::with_len(3);
        buf.add_away(1, Vec2::X);
        buf.add_force(2, Vec2::Y);

        buf.ensure_len(3);

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.count[1], 0);
        assert_eq!(buf.force(2), Vec2::ZERO);
    }

    #[test]
    fn ensure_len_resizes_and_clears() {
        let mut buf = SteeringBuffer::with_len(2);
        buf.add_force(0, Vec2::new(1.0, 0.0));

        buf.ensure_len(4);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.count.len(), 4);
        assert!((0..4).all(|id| buf.force(id) == Vec2::ZERO));

        buf.ensure_len(1);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.force(0), Vec2::ZERO);
    }

    #[test]
    fn mean_away_averages_contributions() {
        let mut buf = SteeringBuffer::with_len(2);
        buf.add_away(1, Vec2::new(1.0, 0.0));
        buf.add_away(1, Vec2::new(0.0, 1.0));

        assert_eq!(buf.count[1], 2);
        assert_eq!(buf.mean_away(1), Vec2::new(0.5, 0.5));
        assert_eq!(buf.mean_away(0), Vec2::ZERO);
    }

    #[test]
    fn forces_accumulate() {
        let mut buf = SteeringBuffer::with_len(1);
        buf.add_force(0, Vec2::new(1.0, 2.0));
        buf.add_force(0, Vec2::new(-3.0, 0.5));
        assert_eq!(buf.force(0), Vec2::new(-2.0, 2.5));
    }

    #[test]
    fn crowded_indices_lists_only_touched_nodes() {
        let mut buf = SteeringBuffer::with_len(4);
        buf.add_away(0, Vec2::X);
        buf.add_away(2, Vec2::Y);
        let ids: Vec<NodeId> = buf.crowded_indices().collect();
        assert_eq!(ids, vec![0, 2]);

        buf.clear();
        assert_eq!(buf.crowded_indices().count(), 0);
    }
}
