//! Flock simulation over a 2D obstacle field.
//!
//! A probabilistic roadmap plans the global route from a start to an end
//! position; every tick the dynamic obstacles move and each agent steers with
//! a blend of flocking, goal seeking and obstacle avoidance.
//!
//! Layers (leaves first)
//! - `geom`: predicates and projections on points, segments and polygons.
//! - `obstacle`: static and bouncing polygon obstacles behind `Boundary`.
//! - `graph`: roadmap storage and the label-setting shortest path.
//! - `planner`: PRM sampling, roadmap construction and the regrowth loop.
//! - `agent`: per-tick steering with an injectable heading strategy.
//! - `scene`, `sim`: map loading, spawn layout, the tick loop and its sinks.

pub mod agent;
pub mod config;
pub mod error;
pub mod geom;
pub mod graph;
pub mod obstacle;
pub mod planner;
pub mod scene;
pub mod sim;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::SimConfig;
pub use error::{ConfigError, GeomError, MapError, PlanError, SolveError};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::agent::{Agent, AgentController, AgentState, HeadingInputs, HeadingStrategy, WeightedBlend};
    pub use crate::config::SimConfig;
    pub use crate::geom::{Polygon, Pt2};
    pub use crate::graph::{shortest_path, Roadmap, WeightedGraph};
    pub use crate::obstacle::{Boundary, Obstacle, ObstacleSet};
    pub use crate::planner::{Goal, Prm};
    pub use crate::sim::{Frame, RenderSink, Simulation, StatsSink, TickStats};
}
