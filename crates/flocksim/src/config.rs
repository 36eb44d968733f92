//! Simulation configuration.
//!
//! One `SimConfig` value is built at startup (defaults, optionally overlaid by a
//! JSON file in the CLI) and passed by reference into every component. Nothing
//! in the crate reads ambient global state.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub planner: PlannerConfig,
    pub obstacles: ObstacleConfig,
    pub agents: AgentConfig,
    /// Master seed; every random draw in a run derives from it.
    pub seed: u64,
    /// Hard stop for `Simulation::run`.
    pub max_ticks: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Initial number of random samples.
    pub sample_count: usize,
    /// Radius of the final goal.
    pub goal_radius: f64,
    /// Radius of every intermediate goal.
    pub subgoal_radius: f64,
    /// Max linear distance between connected samples.
    pub adjacency_radius: f64,
    /// Max edges selected per sample.
    pub max_neighbors: usize,
    /// Samples closer than this to a static obstacle boundary are dropped.
    pub sample_clearance: f64,
    /// Cap on regrowth rounds before planning gives up.
    pub max_regrowths: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Initial speed of dynamic obstacles (along +x).
    pub speed: f64,
    /// Displacement after which a dynamic obstacle must turn.
    pub max_displacement: f64,
    /// Vertex-to-sibling distance that counts as a collision.
    pub contact_clearance: f64,
    /// Distance from a world edge that triggers a rebound.
    pub boundary_margin: f64,
    /// Displacement assigned after a world-edge rebound.
    pub boundary_rebound: f64,
    /// Dynamic obstacles turn back when a vertex gets this close to start/end.
    pub nogo_radius: f64,
    /// Side length of auto-generated square obstacles.
    pub autogen_size: f64,
    /// Min distance from existing obstacles for auto-generated vertices.
    pub autogen_clearance: f64,
    /// Min distance between vertices of different auto-generated obstacles.
    pub autogen_spacing: f64,
    /// Min distance from start/end for auto-generated vertices.
    pub autogen_nogo_radius: f64,
    /// Cap on rejected placements during auto-generation.
    pub autogen_max_attempts: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub radius: f64,
    pub speed: f64,
    pub max_speed: f64,
    /// Number of nearest agents that influence a heading.
    pub neighbor_count: usize,
    /// Extra clearance on top of the agent radius before avoidance kicks in.
    pub safety_margin: f64,
    /// Seconds per tick.
    pub dt: f64,
    /// Ticks of position history used for stuck detection.
    pub stuck_window: usize,
    /// Net displacement over the window below which an agent counts as stuck.
    pub stuck_epsilon: f64,
    pub steering: SteeringWeights,
}

/// Weights of the default heading blend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringWeights {
    pub inertia: f64,
    pub alignment: f64,
    pub goal: f64,
    pub avoidance: f64,
    pub noise: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            planner: PlannerConfig::default(),
            obstacles: ObstacleConfig::default(),
            agents: AgentConfig::default(),
            seed: 0,
            max_ticks: 800,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sample_count: 300,
            goal_radius: 20.0,
            subgoal_radius: 20.0,
            adjacency_radius: 80.0,
            max_neighbors: 20,
            sample_clearance: 10.0,
            max_regrowths: 50,
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            max_displacement: 60.0,
            contact_clearance: 10.0,
            boundary_margin: 10.0,
            boundary_rebound: -40.0,
            nogo_radius: 100.0,
            autogen_size: 30.0,
            autogen_clearance: 20.0,
            autogen_spacing: 30.0,
            autogen_nogo_radius: 150.0,
            autogen_max_attempts: 10_000,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            speed: 30.0,
            max_speed: 30.0,
            neighbor_count: 3,
            safety_margin: 6.0,
            dt: 0.1,
            stuck_window: 20,
            stuck_epsilon: 1.0,
            steering: SteeringWeights::default(),
        }
    }
}

impl Default for SteeringWeights {
    fn default() -> Self {
        Self {
            inertia: 0.5,
            alignment: 0.3,
            goal: 1.0,
            avoidance: 2.0,
            noise: 0.05,
        }
    }
}

impl SimConfig {
    /// Reject values the planner or the tick loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if !(w.width.is_finite() && w.height.is_finite()) || w.width <= 0.0 || w.height <= 0.0 {
            return Err(ConfigError::invalid("world size must be finite and > 0"));
        }
        let p = &self.planner;
        if p.adjacency_radius <= 0.0 {
            return Err(ConfigError::invalid("adjacency_radius must be > 0"));
        }
        if p.max_neighbors == 0 {
            return Err(ConfigError::invalid("max_neighbors must be >= 1"));
        }
        if p.goal_radius <= 0.0 || p.subgoal_radius <= 0.0 {
            return Err(ConfigError::invalid("goal radii must be > 0"));
        }
        if self.obstacles.speed <= 0.0 {
            return Err(ConfigError::invalid("obstacle speed must be > 0"));
        }
        let a = &self.agents;
        if a.speed <= 0.0 || a.max_speed <= 0.0 {
            return Err(ConfigError::invalid("agent speeds must be > 0"));
        }
        if a.dt <= 0.0 {
            return Err(ConfigError::invalid("dt must be > 0"));
        }
        if a.stuck_window == 0 {
            return Err(ConfigError::invalid("stuck_window must be >= 1"));
        }
        Ok(())
    }
}
