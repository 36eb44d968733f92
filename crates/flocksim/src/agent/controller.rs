use std::f64::consts::TAU;

use rand::Rng;

use super::{Agent, AgentState, HeadingInputs, HeadingStrategy, WeightedBlend};
use crate::config::AgentConfig;
use crate::geom::{distance, Pt2};
use crate::obstacle::ObstacleSet;
use crate::planner::Goal;

/// Steps a flock one tick at a time.
pub struct AgentController {
    params: AgentConfig,
    strategy: Box<dyn HeadingStrategy>,
}

impl std::fmt::Debug for AgentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentController")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl AgentController {
    /// Controller with the default `WeightedBlend` built from the configured weights.
    pub fn new(cfg: &AgentConfig) -> Self {
        Self::with_strategy(cfg, WeightedBlend::new(cfg.steering))
    }

    pub fn with_strategy(cfg: &AgentConfig, strategy: impl HeadingStrategy + 'static) -> Self {
        Self {
            params: cfg.clone(),
            strategy: Box::new(strategy),
        }
    }

    /// Agent phase of a tick: every agent in index order against one snapshot.
    pub fn step<R: Rng + ?Sized>(
        &self,
        agents: &mut [Agent],
        goals: &[Goal],
        obstacles: &ObstacleSet,
        rng: &mut R,
    ) {
        let snapshot: Vec<(Pt2, Pt2)> = agents.iter().map(|a| (a.position, a.heading)).collect();
        for (i, agent) in agents.iter_mut().enumerate() {
            let neighbor_headings = self.nearest_headings(i, &snapshot);
            self.step_one(agent, &neighbor_headings, goals, obstacles, rng);
        }
    }

    /// Headings of the `neighbor_count` agents nearest to `i`; ties go to the lower index.
    fn nearest_headings(&self, i: usize, snapshot: &[(Pt2, Pt2)]) -> Vec<Pt2> {
        let me = snapshot[i].0;
        let mut others: Vec<(usize, f64)> = snapshot
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, (p, _))| (j, distance(me, *p)))
            .collect();
        others.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        others
            .into_iter()
            .take(self.params.neighbor_count)
            .map(|(j, _)| snapshot[j].1)
            .collect()
    }

    fn avoidance(&self, agent: &Agent, obstacles: &ObstacleSet) -> Pt2 {
        let Some((q, d)) = obstacles.nearest_boundary_point(agent.position) else {
            return Pt2::zeros();
        };
        if d >= agent.radius + self.params.safety_margin {
            return Pt2::zeros();
        }
        let away = (agent.position - q)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Pt2::zeros);
        if obstacles.any_contains(agent.position) {
            -away
        } else {
            away
        }
    }

    fn step_one<R: Rng + ?Sized>(
        &self,
        agent: &mut Agent,
        neighbor_headings: &[Pt2],
        goals: &[Goal],
        obstacles: &ObstacleSet,
        rng: &mut R,
    ) {
        let to_subgoal = goals
            .get(agent.goal_index)
            .map_or_else(Pt2::zeros, |g| g.position - agent.position);
        let theta = rng.gen_range(0.0..TAU);
        let inputs = HeadingInputs {
            current_heading: agent.heading,
            neighbor_headings,
            to_subgoal,
            avoidance: self.avoidance(agent, obstacles),
            perturbation: Pt2::new(theta.cos(), theta.sin()),
        };
        let raw = self.strategy.combine(&inputs);
        if raw.iter().all(|c| c.is_finite()) {
            if let Some(h) = raw.try_normalize(f64::EPSILON) {
                agent.heading = h;
            }
        }

        let step = agent.heading * agent.speed.min(self.params.max_speed) * self.params.dt;
        let next = agent.position + step;
        let pressed = obstacles.any_contains(next);
        if !pressed {
            agent.position = next;
        }

        let last = goals.len().saturating_sub(1);
        if agent.goal_index < last && goals[agent.goal_index].reached_by(agent.position) {
            agent.goal_index += 1;
        }

        agent.record(self.params.stuck_window);
        let stalled = agent
            .window_drift(self.params.stuck_window)
            .is_some_and(|d| d < self.params.stuck_epsilon);
        let stuck = stalled || pressed;
        if stuck {
            agent.stuck_count += 1;
        }
        agent.state = if agent.is_finished(goals.len()) {
            AgentState::Arrived
        } else if stuck {
            AgentState::Stuck
        } else {
            AgentState::Seeking
        };
    }
}
