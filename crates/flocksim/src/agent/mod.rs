//! Agents and their per-tick steering.
//!
//! Purpose
//! - `Agent` holds kinematic state plus the bookkeeping the stats need
//!   (goal index, stuck counter, a short position history).
//! - `AgentController` advances a whole flock by one tick against the current
//!   obstacles and the planner's goals.
//! - How the heading is mixed from its inputs is a `HeadingStrategy`; the
//!   controller owns one as a trait object and `WeightedBlend` is the default.
//!
//! Model
//! - All agents read the same snapshot of positions and headings taken at the
//!   start of the agent phase, so update order does not leak between agents.
//! - An agent counts as finished once its goal index reaches the last goal.

mod controller;
mod strategy;

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::AgentConfig;
use crate::geom::{distance, Pt2};

pub use controller::AgentController;
pub use strategy::{HeadingInputs, HeadingStrategy, WeightedBlend};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AgentState {
    Seeking,
    Stuck,
    Arrived,
}

#[derive(Clone, Debug, Serialize)]
pub struct Agent {
    position: Pt2,
    heading: Pt2,
    speed: f64,
    radius: f64,
    goal_index: usize,
    stuck_count: usize,
    state: AgentState,
    #[serde(skip)]
    recent: VecDeque<Pt2>,
}

impl Agent {
    /// New agent at `position`. A zero `heading` falls back to +x.
    pub fn new(position: Pt2, heading: Pt2, cfg: &AgentConfig) -> Self {
        let heading = heading.try_normalize(f64::EPSILON).unwrap_or_else(|| Pt2::new(1.0, 0.0));
        Self {
            position,
            heading,
            speed: cfg.speed,
            radius: cfg.radius,
            goal_index: 0,
            stuck_count: 0,
            state: AgentState::Seeking,
            recent: VecDeque::with_capacity(cfg.stuck_window),
        }
    }

    #[inline]
    pub fn position(&self) -> Pt2 {
        self.position
    }

    /// Unit heading.
    #[inline]
    pub fn heading(&self) -> Pt2 {
        self.heading
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn goal_index(&self) -> usize {
        self.goal_index
    }

    #[inline]
    pub fn stuck_count(&self) -> usize {
        self.stuck_count
    }

    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_finished(&self, goal_count: usize) -> bool {
        goal_count > 0 && self.goal_index == goal_count - 1
    }

    /// Net displacement across the recorded window, if it is full.
    fn window_drift(&self, window: usize) -> Option<f64> {
        if self.recent.len() < window {
            return None;
        }
        let (first, last) = (self.recent.front()?, self.recent.back()?);
        Some(distance(*first, *last))
    }

    fn record(&mut self, window: usize) {
        self.recent.push_back(self.position);
        while self.recent.len() > window {
            self.recent.pop_front();
        }
    }
}
