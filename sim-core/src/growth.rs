//! The differential-growth simulator.
//!
//! [`GrowthSimulator`] owns a [`Polyline`], the [`SpatialIndex`] that every
//! node is registered in, and the scratch [`SteeringBuffer`]. One call to
//! [`GrowthSimulator::update`] is one complete tick; the caller never sees
//! a state in which a node sits outside the region that owns it.

use crate::{
    config::Config,
    error::{ConfigError, GrowthError, IndexError},
    phases,
    polyline::{DifferentialNode, Polyline},
    quadtree::SpatialIndex,
    shapes::Rectangle,
    steering_buffer::SteeringBuffer,
    types::NodeId,
};
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct GrowthSimulator {
    line: Polyline,
    index: SpatialIndex,
    cfg: Config,
    buf: SteeringBuffer,
}

impl GrowthSimulator {
    /// Builds a curve through `initial_positions` and registers every node
    /// in `index`. The curve is closed when `cfg.closed` is set.
    ///
    /// ### Errors
    /// - [`GrowthError::Config`] if `cfg` does not validate.
    /// - [`GrowthError::Index`] if `index` is not empty, or a position lies
    ///   outside the index bounds.
    pub fn new(
        initial_positions: impl IntoIterator<Item = Vec2>,
        index: SpatialIndex,
        cfg: Config,
    ) -> Result<Self, GrowthError> {
        cfg.validate()?;
        if !index.is_empty() {
            return Err(IndexError::NotEmpty { len: index.len() }.into());
        }
        let line = Polyline::new(initial_positions, cfg.node_mass, cfg.closed);
        let mut index = index;
        for &id in line.order() {
            index.insert(id, &line.nodes)?;
        }
        let buf = SteeringBuffer::with_len(line.nodes.len());
        Ok(Self {
            line,
            index,
            cfg,
            buf,
        })
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Runs every phase of [`crate::phases`] in order, ending with the
    /// redistribution pass. `update(0.0)` recomputes accelerations but moves
    /// nothing.
    ///
    /// ### Errors
    /// - [`GrowthError::Config`] if `dt` is negative or not finite; nothing
    ///   is changed.
    /// - [`GrowthError::StrayNodes`] if some node could not be placed back in
    ///   the index. The simulator is then inconsistent and should be rebuilt.
    pub fn update(&mut self, dt: f32) -> Result<(), GrowthError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(ConfigError::Negative {
                name: "delta_time",
                value: dt,
            }
            .into());
        }

        self.buf.ensure_len(self.line.nodes.len());

        phases::repulsion_phase(&self.line, &self.index, &self.cfg, &mut self.buf);
        phases::attraction_phase(&self.line, &self.cfg, &mut self.buf);
        phases::containment_phase(&self.line, &self.cfg, &mut self.buf);

        let domain = self.index.bounds();
        phases::integration_phase(&mut self.line, &mut self.index, &self.buf, domain, dt);
        phases::redistribution_phase(&self.line, &mut self.index)
    }

    /// Splits edge `edge_index` at its midpoint.
    ///
    /// Open curves accept `0 <= edge_index < len - 1`; closed curves accept
    /// any index and wrap it modulo `len`. The new node is placed exactly
    /// halfway between the edge's endpoints, at rest, and is registered in
    /// the index.
    ///
    /// ### Errors
    /// - [`GrowthError::EdgeOutOfRange`] if the edge does not exist.
    /// - [`GrowthError::Index`] if the index cannot take the new node.
    ///
    /// The curve is left untouched on error.
    ///
    /// ### Returns
    /// The id of the new node.
    pub fn add_point(&mut self, edge_index: usize) -> Result<NodeId, GrowthError> {
        let (a, b) = self
            .line
            .edge(edge_index)
            .ok_or(GrowthError::EdgeOutOfRange {
                index: edge_index,
                edges: self.line.edge_count(),
            })?;
        let midpoint = (self.line.nodes[a].position + self.line.nodes[b].position) * 0.5;

        let id = self.line.nodes.len();
        if !self.index.bounds().contains_point(midpoint) {
            return Err(IndexError::OutOfBounds {
                id,
                x: midpoint.x,
                y: midpoint.y,
            }
            .into());
        }
        if self.index.region_of(id).is_some() {
            return Err(IndexError::AlreadyRegistered { id }.into());
        }

        let after = if self.line.is_closed() {
            edge_index % self.line.len()
        } else {
            edge_index
        };
        let id = self
            .line
            .insert_after(after, DifferentialNode::new(midpoint, self.cfg.node_mass));
        self.index.insert(id, &self.line.nodes)?;
        Ok(id)
    }

    /// Splits every edge longer than `max_edge_length` once.
    ///
    /// Each edge present when the call starts is looked at exactly once; the
    /// two halves of a split edge are not split again until the next call.
    ///
    /// ### Returns
    /// How many nodes were added.
    pub fn split_long_edges(&mut self) -> Result<usize, GrowthError> {
        let max_sq = self.cfg.max_edge_length * self.cfg.max_edge_length;
        let mut added = 0;
        let mut edge = 0;
        while edge < self.line.edge_count() {
            let Some((a, b)) = self.line.edge(edge) else {
                break;
            };
            let len_sq = self.line.nodes[a]
                .position
                .distance_squared(self.line.nodes[b].position);
            if len_sq > max_sq {
                self.add_point(edge)?;
                added += 1;
                edge += 2;
            } else {
                edge += 1;
            }
        }
        if added > 0 {
            log::debug!("split {added} edge(s), {} nodes now", self.line.len());
        }
        Ok(added)
    }

    /// Nodes in curve order, for drawing.
    pub fn nodes(&self) -> impl Iterator<Item = &DifferentialNode> + '_ {
        self.line.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.line.iter().map(|n| n.position)
    }

    pub fn node(&self, id: NodeId) -> Option<&DifferentialNode> {
        self.line.nodes.get(id)
    }

    /// Pins or releases a node.
    pub fn set_fixed(&mut self, id: NodeId, fixed: bool) -> Result<(), GrowthError> {
        let node = self
            .line
            .nodes
            .get_mut(id)
            .ok_or(GrowthError::UnknownNode { id })?;
        node.fixed = fixed;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.line.is_closed()
    }

    pub fn polyline(&self) -> &Polyline {
        &self.line
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn bounds(&self) -> Rectangle {
        self.index.bounds()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replaces the growth parameters.
    ///
    /// Whether the curve is closed is fixed at construction, so
    /// `cfg.closed` is ignored. The node mass only applies to nodes created
    /// from now on.
    pub fn set_config(&mut self, cfg: Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.cfg = Config {
            closed: self.line.is_closed(),
            ..cfg
        };
        Ok(())
    }
}
