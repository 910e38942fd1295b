//! Point quadtree with dynamic membership.
//!
//! Regions live in a flat arena and refer to each other by [`RegionId`].
//! The index never stores positions: callers pass the slice of
//! [`Located`] items on every call and a [`NodeId`] is an index into it.
//! Each registered node is owned by exactly one leaf region, recorded in
//! `owner`. When a node moves the caller checks [`SpatialIndex::region_contains`]
//! and, if it left its region, calls [`SpatialIndex::mark_dirty`]; the next
//! [`SpatialIndex::redistribute_dirty_points`] re-homes it.
//!
//! Subdivision is one-way. Nodes are never removed from the index, so the
//! tree never needs to shrink.

use crate::{
    config::QuadtreeConfig,
    error::{ConfigError, IndexError},
    shapes::{Circle, Located, Rectangle},
    types::{NodeId, RegionId},
};

#[derive(Debug, Clone)]
struct Region {
    bounds: Rectangle,
    depth: usize,
    children: Option<[RegionId; 4]>,
    /// Only leaves hold members.
    members: Vec<NodeId>,
}

impl Region {
    fn leaf(bounds: Rectangle, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            children: None,
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    bounds: Rectangle,
    config: QuadtreeConfig,
    regions: Vec<Region>,
    owner: Vec<Option<RegionId>>,
    dirty: Vec<bool>,
    dirty_list: Vec<NodeId>,
    len: usize,
}

impl SpatialIndex {
    /// Creates an empty index covering `bounds` with the default
    /// [`QuadtreeConfig`].
    pub fn new(bounds: Rectangle) -> Self {
        Self::build(bounds, QuadtreeConfig::default())
    }

    /// Creates an empty index covering `bounds` with a custom subdivision
    /// policy.
    ///
    /// ### Parameters
    /// - `bounds` - Domain every inserted node must lie in.
    /// - `config` - Leaf capacity and maximum depth.
    ///
    /// ### Errors
    /// [`ConfigError::ZeroCapacity`] if `config.capacity` is zero.
    pub fn with_config(bounds: Rectangle, config: QuadtreeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(bounds, config))
    }

    fn build(bounds: Rectangle, config: QuadtreeConfig) -> Self {
        Self {
            bounds,
            config,
            regions: vec![Region::leaf(bounds, 0)],
            owner: Vec::new(),
            dirty: Vec::new(),
            dirty_list: Vec::new(),
            len: 0,
        }
    }

    /// The root rectangle; no node outside it can be registered.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// The subdivision policy this index was built with.
    pub fn config(&self) -> QuadtreeConfig {
        self.config
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of regions in the arena, interior ones included.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of nodes flagged for redistribution. Between passes this is
    /// the number of stray nodes.
    pub fn dirty_count(&self) -> usize {
        self.dirty_list.len()
    }

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.dirty.get(id).copied().unwrap_or(false)
    }

    /// The leaf currently owning `id`, if it is registered.
    pub fn region_of(&self, id: NodeId) -> Option<RegionId> {
        self.owner.get(id).copied().flatten()
    }

    /// Bounds of `region`, or `None` for a handle from another index.
    pub fn region_bounds(&self, region: RegionId) -> Option<Rectangle> {
        self.regions.get(region.index()).map(|r| r.bounds)
    }

    /// Whether the region owning `id` still contains `position`.
    ///
    /// ### Parameters
    /// - `id` - Registered node.
    /// - `position` - Where the node is now.
    ///
    /// ### Returns
    /// `false` if the node left its region, or is not registered at all.
    pub fn region_contains(&self, id: NodeId, position: glam::Vec2) -> bool {
        self.region_of(id)
            .is_some_and(|r| self.regions[r.index()].bounds.contains_point(position))
    }

    /// Appends the bounds of every leaf region to `out`.
    ///
    /// ### Parameters
    /// - `out` - Output vector; existing contents are kept.
    pub fn leaf_bounds(&self, out: &mut Vec<Rectangle>) {
        out.extend(
            self.regions
                .iter()
                .filter(|r| r.children.is_none())
                .map(|r| r.bounds),
        );
    }

    /// Registers `id`, reading its position from `points[id]`.
    ///
    /// ### Errors
    /// - [`IndexError::UnknownNode`] if `points` has no entry for `id`.
    /// - [`IndexError::AlreadyRegistered`] if `id` is already in the index.
    /// - [`IndexError::OutOfBounds`] if the position lies outside
    ///   [`SpatialIndex::bounds`]. The index is left unchanged.
    ///
    /// ### Returns
    /// The leaf that owns `id` once any subdivision has settled.
    pub fn insert<T: Located>(&mut self, id: NodeId, points: &[T]) -> Result<RegionId, IndexError> {
        let pos = points
            .get(id)
            .ok_or(IndexError::UnknownNode { id })?
            .position();
        if self.region_of(id).is_some() {
            return Err(IndexError::AlreadyRegistered { id });
        }
        if !self.bounds.contains_point(pos) {
            return Err(IndexError::OutOfBounds {
                id,
                x: pos.x,
                y: pos.y,
            });
        }

        if self.owner.len() <= id {
            self.owner.resize(id + 1, None);
            self.dirty.resize(id + 1, false);
        }
        self.len += 1;
        Ok(self.insert_from_root(id, points))
    }

    /// Descends from the root to the leaf containing the node and adds it
    /// there, splitting the leaf if it overflows.
    fn insert_from_root<T: Located>(&mut self, id: NodeId, points: &[T]) -> RegionId {
        let pos = points[id].position();
        let mut region = RegionId::ROOT;
        while let Some(children) = self.regions[region.index()].children {
            let quadrant = self.regions[region.index()].bounds.quadrant_of(pos);
            region = children[quadrant];
        }

        self.regions[region.index()].members.push(id);
        self.owner[id] = Some(region);

        if self.overflows(region) {
            self.subdivide(region, points);
        }
        self.owner[id].unwrap_or(region)
    }

    fn overflows(&self, region: RegionId) -> bool {
        let r = &self.regions[region.index()];
        r.members.len() > self.config.capacity && r.depth < self.config.max_depth
    }

    /// Splits a leaf into four equal quadrants and hands its members down.
    /// A child that still overflows is split in turn.
    fn subdivide<T: Located>(&mut self, region: RegionId, points: &[T]) {
        let (bounds, depth) = {
            let r = &self.regions[region.index()];
            (r.bounds, r.depth)
        };

        let first = self.regions.len();
        let [Some(nw), Some(ne), Some(sw), Some(se)] =
            [0, 1, 2, 3].map(|i| RegionId::new(first + i))
        else {
            log::warn!(
                "region arena is full, leaving region {} unsplit",
                region.index()
            );
            return;
        };
        let children = [nw, ne, sw, se];
        for i in 0..4 {
            self.regions.push(Region::leaf(bounds.quadrant(i), depth + 1));
        }

        let members = std::mem::take(&mut self.regions[region.index()].members);
        self.regions[region.index()].children = Some(children);
        log::trace!(
            "subdividing region {} at depth {depth} ({} members)",
            region.index(),
            members.len()
        );

        for id in members {
            let child = children[bounds.quadrant_of(points[id].position())];
            self.regions[child.index()].members.push(id);
            self.owner[id] = Some(child);
        }

        for child in children {
            if self.overflows(child) {
                self.subdivide(child, points);
            }
        }
    }

    /// Flags `id` for re-homing on the next redistribution pass.
    ///
    /// Marking twice is harmless. Unregistered ids are ignored.
    pub fn mark_dirty(&mut self, id: NodeId) {
        if self.region_of(id).is_none() {
            log::debug!("ignoring mark_dirty for unregistered node {id}");
            return;
        }
        if !self.dirty[id] {
            self.dirty[id] = true;
            self.dirty_list.push(id);
        }
    }

    /// Re-homes every dirty node.
    ///
    /// Each dirty node is removed from its region and inserted again from
    /// the root. A node whose position is outside the index bounds cannot be
    /// re-homed: it stays where it was, stays dirty and is returned.
    ///
    /// ### Panics
    /// Panics if `points` is shorter than the largest registered id.
    pub fn redistribute_dirty_points<T: Located>(&mut self, points: &[T]) -> Vec<NodeId> {
        let pending = std::mem::take(&mut self.dirty_list);
        let mut strays = Vec::new();

        for id in pending.iter().copied() {
            let pos = points[id].position();
            if !self.bounds.contains_point(pos) {
                strays.push(id);
                continue;
            }

            self.dirty[id] = false;
            let Some(region) = self.region_of(id) else {
                continue;
            };
            if self.regions[region.index()].bounds.contains_point(pos) {
                continue;
            }
            let members = &mut self.regions[region.index()].members;
            if let Some(slot) = members.iter().position(|&m| m == id) {
                members.swap_remove(slot);
            }
            self.insert_from_root(id, points);
        }

        if !pending.is_empty() {
            log::debug!(
                "redistributed {} node(s), {} stray",
                pending.len() - strays.len(),
                strays.len()
            );
        }
        self.dirty_list = strays.clone();
        strays
    }

    /// Calls `f` for every registered node within `circle`.
    ///
    /// Regions whose bounds miss the circle are skipped. Dirty nodes are
    /// tested directly, so the result is exact even between a position
    /// update and the next redistribution.
    ///
    /// ### Panics
    /// Panics if `points` is shorter than the largest registered id.
    pub fn circle_query_with<T, F>(&self, circle: &Circle, points: &[T], mut f: F)
    where
        T: Located,
        F: FnMut(NodeId),
    {
        if circle.is_degenerate() || self.len == 0 {
            return;
        }

        let mut stack = Vec::with_capacity(32);
        if self.regions[0].bounds.intersects_circle(circle) {
            stack.push(RegionId::ROOT);
        }

        while let Some(region) = stack.pop() {
            let r = &self.regions[region.index()];
            match r.children {
                Some(children) => {
                    for child in children {
                        if self.regions[child.index()].bounds.intersects_circle(circle) {
                            stack.push(child);
                        }
                    }
                }
                None => {
                    for &id in &r.members {
                        if !self.dirty[id] && circle.contains_point(points[id].position()) {
                            f(id);
                        }
                    }
                }
            }
        }

        for &id in &self.dirty_list {
            if circle.contains_point(points[id].position()) {
                f(id);
            }
        }
    }

    /// Every registered node within `circle`, in no particular order.
    /// A zero, negative or non-finite radius yields an empty result.
    pub fn circle_query<T: Located>(&self, circle: &Circle, points: &[T]) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.circle_query_with(circle, points, |id| found.push(id));
        found
    }

    /// Checks the containment invariant: every registered node that is not
    /// dirty sits in a leaf whose bounds contain its position.
    pub fn validate<T: Located>(&self, points: &[T]) -> Result<(), IndexError> {
        for (id, owner) in self.owner.iter().enumerate() {
            let Some(region) = owner else {
                continue;
            };
            if self.dirty[id] {
                continue;
            }
            let pos = points
                .get(id)
                .ok_or(IndexError::UnknownNode { id })?
                .position();
            let r = &self.regions[region.index()];
            if r.children.is_some() || !r.members.contains(&id) || !r.bounds.contains_point(pos) {
                return Err(IndexError::MisplacedNode {
                    id,
                    x: pos.x,
                    y: pos.y,
                });
            }
        }
        Ok(())
    }
}
