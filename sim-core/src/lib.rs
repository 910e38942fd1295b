//! Core 2-D differential growth library.
//!
//! Main components:
//! - [`quadtree`]: point quadtree over a fixed rectangle with dirty-point
//!   redistribution.
//! - [`growth`]: the simulator that owns a curve and its spatial index.
//! - [`polyline`]: curve nodes, traversal order and seed shapes.
//! - [`config`]: growth and quadtree parameters.
//! - [`steering`]: steering-behaviour primitives.
//! - [`steering_buffer`]: per-tick scratch buffers for accumulated forces.
//! - [`phases`]: the simulation phases a tick is made of.
//! - [`shapes`]: rectangles, circles and the [`shapes::Located`] trait.
//! - [`error`]: error types.
//! - [`types`]: shared type aliases and ids.

pub mod config;
pub mod error;
pub mod growth;
pub mod phases;
pub mod polyline;
pub mod quadtree;
pub mod shapes;
pub mod steering;
pub mod steering_buffer;
pub mod types;

pub use config::{Boundary, Config, QuadtreeConfig};
pub use error::{ConfigError, GrowthError, IndexError};
pub use growth::GrowthSimulator;
pub use polyline::{DifferentialNode, Polyline};
pub use quadtree::SpatialIndex;
pub use shapes::{Circle, Located, Rectangle};
pub use types::{NodeId, RegionId};
