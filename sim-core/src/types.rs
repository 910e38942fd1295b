/// Identifier for a node in a [`crate::polyline::Polyline`].
///
/// This is an index into the polyline's node arena. It stays valid for the
/// lifetime of the polyline because nodes are only ever appended; the
/// traversal order is kept separately and may shift when edges are split.
pub type NodeId = usize;

/// Handle to a region in a [`crate::quadtree::SpatialIndex`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(u32);

impl RegionId {
    pub const ROOT: RegionId = RegionId(0);

    /// Handle for arena slot `index`.
    ///
    /// ### Returns
    /// `None` if `index` does not fit in a `u32`.
    pub fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
