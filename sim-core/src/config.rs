use crate::error::ConfigError;
use glam::Vec2;

/// Optional region the curve is steered to stay within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    Circle { center: Vec2, radius: f32 },
}

/// Growth parameters shared by every phase of a tick.
///
/// Distances are in domain units, speeds in units per second and forces in
/// units per second squared per unit of mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Neighbours on the curve closer than this are not attracted further.
    pub min_distance: f32,
    /// Radius of the repulsion query around each node.
    pub repulsion_radius: f32,
    /// Magnitude of every desired velocity.
    pub max_speed: f32,
    /// Upper bound on each individual steering force.
    pub max_force: f32,
    pub attraction_weight: f32,
    pub repulsion_weight: f32,
    pub containment_weight: f32,
    pub boundary: Option<Boundary>,
    /// Edges longer than this are split by `GrowthSimulator::split_long_edges`.
    pub max_edge_length: f32,
    /// Mass given to every node the simulator creates.
    pub node_mass: f32,
    /// Whether the last node connects back to the first.
    pub closed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            repulsion_radius: 20.0,
            max_speed: 40.0,
            max_force: 30.0,
            attraction_weight: 1.0,
            repulsion_weight: 1.2,
            containment_weight: 1.0,
            boundary: None,
            max_edge_length: 10.0,
            node_mass: 1.0,
            closed: true,
        }
    }
}

impl Config {
    /// Checks that every parameter is usable.
    ///
    /// Weights may be zero (which disables that force); everything else
    /// must be strictly positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("min_distance", self.min_distance)?;
        positive("repulsion_radius", self.repulsion_radius)?;
        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        non_negative("attraction_weight", self.attraction_weight)?;
        non_negative("repulsion_weight", self.repulsion_weight)?;
        non_negative("containment_weight", self.containment_weight)?;
        positive("max_edge_length", self.max_edge_length)?;
        positive("node_mass", self.node_mass)?;
        if let Some(Boundary::Circle { center, radius }) = self.boundary {
            if !center.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: "boundary center",
                    x: center.x,
                    y: center.y,
                });
            }
            positive("boundary radius", radius)?;
        }
        Ok(())
    }
}

/// Subdivision policy of the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadtreeConfig {
    /// A leaf holding more members than this splits into four.
    pub capacity: usize,
    /// Leaves at this depth never split, whatever their member count.
    pub max_depth: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            max_depth: 10,
        }
    }
}

impl QuadtreeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
