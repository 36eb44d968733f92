//! The tick loop.
//!
//! Model
//! - Planning happens once, in `Simulation::new`. After that each tick moves
//!   the dynamic obstacles, then steps every agent, then reports.
//! - One `StdRng` drives planning, obstacle turns and steering noise. A run is
//!   reproducible from the configuration seed plus the scene.
//! - `run` stops at a tick boundary: when the stop predicate fires, when every
//!   agent has arrived, or at `max_ticks`.
//!
//! Output goes through two sinks. `RenderSink` sees a borrowed `Frame` of the
//! whole world, `StatsSink` a small `TickStats` record.

mod stats;

use std::time::Instant;

use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::agent::{Agent, AgentController};
use crate::config::SimConfig;
use crate::error::PlanError;
use crate::graph::Roadmap;
use crate::obstacle::ObstacleSet;
use crate::planner::{Goal, Prm};
use crate::scene::{spawn_grid, Scene};

pub use stats::{spacing, TickStats};

/// Borrowed view of the world after a tick.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Frame<'a> {
    pub step: usize,
    pub obstacles: &'a ObstacleSet,
    pub roadmap: &'a Roadmap,
    /// Roadmap node indices of the planned path.
    pub path: &'a [usize],
    pub goals: &'a [Goal],
    pub agents: &'a [Agent],
}

pub trait RenderSink {
    fn frame(&mut self, frame: &Frame<'_>);
}

pub trait StatsSink {
    fn record(&mut self, stats: &TickStats);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl RenderSink for Discard {
    fn frame(&mut self, _frame: &Frame<'_>) {}
}

impl StatsSink for Discard {
    fn record(&mut self, _stats: &TickStats) {}
}

impl StatsSink for Vec<TickStats> {
    fn record(&mut self, stats: &TickStats) {
        self.push(*stats);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    AllArrived,
    Predicate,
    TickLimit,
}

/// Outcome of `Simulation::run`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: usize,
    pub flock: usize,
    pub arrived: usize,
    pub stuck_total: usize,
    pub elapsed_secs: f64,
    pub reason: StopReason,
}

#[derive(Debug)]
pub struct Simulation {
    max_ticks: usize,
    rng: StdRng,
    obstacles: ObstacleSet,
    prm: Prm,
    goals: Vec<Goal>,
    agents: Vec<Agent>,
    controller: AgentController,
    step: usize,
    started: Option<Instant>,
}

impl Simulation {
    /// Plan a route through `scene` and spawn `flock` agents on a grid at its start.
    ///
    /// `rng` should be seeded from `cfg.seed`; it is the only randomness the
    /// run uses from here on.
    pub fn new(cfg: &SimConfig, scene: Scene, flock: usize, mut rng: StdRng) -> Result<Self, PlanError> {
        let mut prm = Prm::new(scene.start, scene.end, cfg);
        let goals = prm.plan(&scene.obstacles, &mut rng)?;
        let heading = scene.end - scene.start;
        let agents = spawn_grid(scene.start, flock, cfg.agents.radius)
            .into_iter()
            .map(|p| Agent::new(p, heading, &cfg.agents))
            .collect();
        info!(flock, goals = goals.len(), "simulation ready");
        Ok(Self {
            max_ticks: cfg.max_ticks,
            rng,
            obstacles: scene.obstacles,
            prm,
            goals,
            agents,
            controller: AgentController::new(&cfg.agents),
            step: 0,
            started: None,
        })
    }

    /// Replace the default controller, e.g. to inject another heading strategy.
    pub fn with_controller(mut self, controller: AgentController) -> Self {
        self.controller = controller;
        self
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.step
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn planner(&self) -> &Prm {
        &self.prm
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            step: self.step,
            obstacles: &self.obstacles,
            roadmap: self.prm.roadmap(),
            path: self.prm.path(),
            goals: &self.goals,
            agents: &self.agents,
        }
    }

    /// One tick: obstacles first, then agents.
    pub fn tick(&mut self) -> TickStats {
        let started = *self.started.get_or_insert_with(Instant::now);
        self.obstacles.advance(&mut self.rng);
        self.controller
            .step(&mut self.agents, &self.goals, &self.obstacles, &mut self.rng);
        self.step += 1;
        let stats = stats::collect(
            self.step,
            started.elapsed().as_secs_f64(),
            &self.agents,
            self.goals.len(),
        );
        tracing::trace!(step = stats.step, arrived = stats.arrived, "tick");
        stats
    }

    /// Tick until `stop` fires, every agent has arrived, or `max_ticks` is reached.
    pub fn run<F>(
        &mut self,
        render: &mut dyn RenderSink,
        sink: &mut dyn StatsSink,
        mut stop: F,
    ) -> RunSummary
    where
        F: FnMut(&TickStats) -> bool,
    {
        let mut last: Option<TickStats> = None;
        let reason = loop {
            if self.step >= self.max_ticks {
                break StopReason::TickLimit;
            }
            let stats = self.tick();
            render.frame(&self.frame());
            sink.record(&stats);
            last = Some(stats);
            if stats.arrived == self.agents.len() {
                break StopReason::AllArrived;
            }
            if stop(&stats) {
                break StopReason::Predicate;
            }
        };
        let summary = RunSummary {
            ticks: self.step,
            flock: self.agents.len(),
            arrived: last.map_or(0, |s| s.arrived),
            stuck_total: last.map_or(0, |s| s.stuck_total),
            elapsed_secs: last.map_or(0.0, |s| s.elapsed_secs),
            reason,
        };
        debug!(?summary, "run finished");
        summary
    }
}
