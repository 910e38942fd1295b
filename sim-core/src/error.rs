//! Error types for the spatial index, the configuration and the simulator.

use crate::types::NodeId;
use glam::Vec2;
use std::fmt;

/// Failures reported by [`crate::quadtree::SpatialIndex`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    #[error("node {id} at ({x}, {y}) lies outside the index bounds")]
    OutOfBounds { id: NodeId, x: f32, y: f32 },
    #[error("node {id} is already registered")]
    AlreadyRegistered { id: NodeId },
    #[error("node {id} is not registered")]
    UnknownNode { id: NodeId },
    #[error("node {id} at ({x}, {y}) is not contained by its owning region")]
    MisplacedNode { id: NodeId, x: f32, y: f32 },
    #[error("index already holds {len} node(s); a simulator needs an empty one")]
    NotEmpty { len: usize },
}

/// Invalid simulation or index parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be finite and positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be finite (got ({x}, {y}))")]
    NonFinite { name: &'static str, x: f32, y: f32 },
    #[error("quadtree capacity must be at least 1")]
    ZeroCapacity,
    #[error(
        "rectangle corners must be finite with min <= max (min: ({min_x}, {min_y}), max: ({max_x}, {max_y}))"
    )]
    InvalidRectangle {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },
}

/// A node still outside the domain after a redistribution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrayNode {
    pub id: NodeId,
    pub position: Vec2,
}

impl fmt::Display for StrayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} at ({}, {})",
            self.id, self.position.x, self.position.y
        )
    }
}

/// Nodes listed after a failed redistribution.
#[derive(Debug, Clone, PartialEq)]
pub struct StrayNodes(pub Vec<StrayNode>);

impl fmt::Display for StrayNodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} node(s) outside the domain: ", self.0.len())?;
        for (i, stray) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{stray}")?;
        }
        Ok(())
    }
}

/// Failures reported by [`crate::growth::GrowthSimulator`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrowthError {
    #[error("edge index {index} is out of range for a polyline with {edges} edges")]
    EdgeOutOfRange { index: usize, edges: usize },
    #[error("node {id} does not exist")]
    UnknownNode { id: NodeId },
    /// The clamp/dirty-tracking contract was broken; the simulator should be
    /// reset rather than stepped again.
    #[error("stray nodes after redistribution: {0}")]
    StrayNodes(StrayNodes),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
