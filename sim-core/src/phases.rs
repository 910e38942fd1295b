//! Simulation phases of one differential-growth tick.
//!
//! The update loop run by [`crate::growth::GrowthSimulator::update`] is:
//! 1. [`repulsion_phase`]: every node looks up nearby nodes in the
//!    [`SpatialIndex`] and steers away from their mean direction.
//! 2. [`attraction_phase`]: every node steers toward each curve neighbour
//!    that is farther than `min_distance`.
//! 3. [`containment_phase`]: nodes outside the optional boundary steer
//!    back toward its centre.
//! 4. [`integration_phase`]: forces become motion; nodes are clamped to
//!    the domain and flagged dirty if they left their region.
//! 5. [`redistribution_phase`]: dirty nodes are re-homed in the index.
//!
//! Phases 1 to 3 only read node state and write into a [`SteeringBuffer`],
//! so every force in a tick is computed from the same snapshot of
//! positions and velocities.

use crate::{
    config::{Boundary, Config},
    error::{GrowthError, StrayNode, StrayNodes},
    polyline::Polyline,
    quadtree::SpatialIndex,
    shapes::{Circle, Rectangle},
    steering::steer,
    steering_buffer::SteeringBuffer,
};

/// Accumulates repulsion from nearby nodes.
///
/// For each non-fixed node:
///
/// 1. Queries `index` for every node within `cfg.repulsion_radius`.
/// 2. For each other node found, adds the unit vector pointing from it to
///    this node via [`SteeringBuffer::add_away`]. Coincident nodes have no
///    direction and are skipped.
/// 3. Steers along the mean of those vectors, weighted by
///    `cfg.repulsion_weight`. A node with no neighbours gets no force.
///
/// ### Panics
/// Panics if `buf` is shorter than `line.nodes`.
pub fn repulsion_phase(
    line: &Polyline,
    index: &SpatialIndex,
    cfg: &Config,
    buf: &mut SteeringBuffer,
) {
    for &id in line.order() {
        let node = &line.nodes[id];
        if node.fixed {
            continue;
        }
        let query = Circle::new(node.position, cfg.repulsion_radius);
        index.circle_query_with(&query, &line.nodes, |other| {
            if other == id {
                return;
            }
            let away = node.position - line.nodes[other].position;
            if let Some(dir) = away.try_normalize() {
                buf.add_away(id, dir);
            }
        });
    }

    let crowded: Vec<_> = buf.crowded_indices().collect();
    for id in crowded {
        let node = &line.nodes[id];
        let force = steer(buf.mean_away(id), node.velocity, cfg.max_speed, cfg.max_force);
        buf.add_force(id, force * cfg.repulsion_weight);
    }
}

/// Pulls every non-fixed node toward its curve neighbours.
///
/// Each neighbour (previous and next, wrapping on closed curves) farther
/// than `cfg.min_distance` contributes one seek force, weighted by
/// `cfg.attraction_weight`. Neighbours already that close contribute
/// nothing, which keeps adjacent nodes from oscillating around each other.
pub fn attraction_phase(line: &Polyline, cfg: &Config, buf: &mut SteeringBuffer) {
    for (i, &id) in line.order().iter().enumerate() {
        let node = &line.nodes[id];
        if node.fixed {
            continue;
        }
        for neighbor in line.neighbors(i).into_iter().flatten() {
            let offset = line.nodes[neighbor].position - node.position;
            if offset.length() > cfg.min_distance {
                let force = steer(offset, node.velocity, cfg.max_speed, cfg.max_force);
                buf.add_force(id, force * cfg.attraction_weight);
            }
        }
    }
}

/// Steers nodes outside `cfg.boundary` back toward its centre.
///
/// Does nothing when no boundary is configured; nodes inside (or exactly on)
/// the boundary get no force.
pub fn containment_phase(line: &Polyline, cfg: &Config, buf: &mut SteeringBuffer) {
    let Some(Boundary::Circle { center, radius }) = cfg.boundary else {
        return;
    };
    for &id in line.order() {
        let node = &line.nodes[id];
        if node.fixed || node.position.distance(center) <= radius {
            continue;
        }
        let force = steer(
            center - node.position,
            node.velocity,
            cfg.max_speed,
            cfg.max_force,
        );
        buf.add_force(id, force * cfg.containment_weight);
    }
}

/// Turns accumulated forces into motion (semi-implicit Euler).
///
/// For each non-fixed node: `acceleration = force / mass`, then
/// `velocity += acceleration * dt`, then `position += velocity * dt`,
/// clamped to `domain`. Nodes that end up outside the region owning them
/// are marked dirty in `index`.
pub fn integration_phase(
    line: &mut Polyline,
    index: &mut SpatialIndex,
    buf: &SteeringBuffer,
    domain: Rectangle,
    dt: f32,
) {
    for i in 0..line.len() {
        let id = line.order()[i];
        let node = &mut line.nodes[id];
        if node.fixed {
            continue;
        }
        node.acceleration = buf.force(id) / node.mass;
        node.velocity += node.acceleration * dt;
        node.position = domain.clamp_point(node.position + node.velocity * dt);

        if !index.region_contains(id, node.position) {
            index.mark_dirty(id);
        }
    }
}

/// Re-homes dirty nodes and fails if any of them lies outside the domain.
///
/// ### Errors
/// [`GrowthError::StrayNodes`] listing every node the index could not place.
/// Since [`integration_phase`] clamps positions to the domain, this means
/// the domain and the index bounds disagree.
pub fn redistribution_phase(line: &Polyline, index: &mut SpatialIndex) -> Result<(), GrowthError> {
    let strays = index.redistribute_dirty_points(&line.nodes);
    if strays.is_empty() {
        return Ok(());
    }
    let strays = strays
        .into_iter()
        .map(|id| StrayNode {
            id,
            position: line.nodes[id].position,
        })
        .collect();
    Err(GrowthError::StrayNodes(StrayNodes(strays)))
}
