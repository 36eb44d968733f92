use serde::Serialize;

use crate::agent::{Agent, AgentState};
use crate::geom::distance;

/// Per-tick flock summary handed to `StatsSink`s.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TickStats {
    pub step: usize,
    /// Wall-clock seconds since the first tick of the run.
    pub elapsed_secs: f64,
    /// Mean over agents of the average distance to every other agent.
    pub mean_distance: f64,
    /// Mean over agents of the distance to the nearest other agent.
    pub mean_nearest: f64,
    /// Agents whose goal index reached the last goal.
    pub arrived: usize,
    /// Sum of all agents' stuck counters.
    pub stuck_total: usize,
    /// Agents flagged stuck on this tick.
    pub stuck_now: usize,
}

/// `(mean_distance, mean_nearest)`; both zero for fewer than two agents.
pub fn spacing(agents: &[Agent]) -> (f64, f64) {
    let n = agents.len();
    if n < 2 {
        return (0.0, 0.0);
    }
    let mut avg_sum = 0.0;
    let mut min_sum = 0.0;
    for (i, a) in agents.iter().enumerate() {
        let mut total = 0.0;
        let mut nearest = f64::INFINITY;
        for (j, b) in agents.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = distance(a.position(), b.position());
            total += d;
            nearest = nearest.min(d);
        }
        avg_sum += total / (n - 1) as f64;
        min_sum += nearest;
    }
    (avg_sum / n as f64, min_sum / n as f64)
}

pub(crate) fn collect(step: usize, elapsed_secs: f64, agents: &[Agent], goal_count: usize) -> TickStats {
    let (mean_distance, mean_nearest) = spacing(agents);
    TickStats {
        step,
        elapsed_secs,
        mean_distance,
        mean_nearest,
        arrived: agents.iter().filter(|a| a.is_finished(goal_count)).count(),
        stuck_total: agents.iter().map(Agent::stuck_count).sum(),
        stuck_now: agents
            .iter()
            .filter(|a| a.state() == AgentState::Stuck)
            .count(),
    }
}
