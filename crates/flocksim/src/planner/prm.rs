use rand::Rng;
use tracing::{debug, info, warn};

use super::Goal;
use crate::config::{PlannerConfig, SimConfig, WorldConfig};
use crate::error::PlanError;
use crate::geom::{distance, Pt2};
use crate::graph::{shortest_path, Roadmap};
use crate::obstacle::{Boundary, Obstacle, ObstacleSet};

/// Lower bound on openness in edge weights; keeps empty worlds finite.
pub const OMEGA_FLOOR: f64 = 1e-6;

/// Planner state: the roadmap grown so far and the last solved path.
#[derive(Clone, Debug)]
pub struct Prm {
    start: Pt2,
    end: Pt2,
    world: WorldConfig,
    params: PlannerConfig,
    roadmap: Roadmap,
    /// Openness per roadmap node, same indexing.
    omega: Vec<f64>,
    path: Vec<usize>,
    regrowths: usize,
}

impl Prm {
    pub fn new(start: Pt2, end: Pt2, cfg: &SimConfig) -> Self {
        Self {
            start,
            end,
            world: cfg.world,
            params: cfg.planner.clone(),
            roadmap: Roadmap::new(),
            omega: Vec::new(),
            path: Vec::new(),
            regrowths: 0,
        }
    }

    #[inline]
    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    /// Node indices of the last solved path, start first.
    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    #[inline]
    pub fn regrowths(&self) -> usize {
        self.regrowths
    }

    pub fn path_positions(&self) -> Vec<Pt2> {
        self.path.iter().map(|v| self.roadmap.position(*v)).collect()
    }

    /// Build the roadmap, regrowing until the end is reachable, and return the goals.
    ///
    /// Every call starts a fresh roadmap. The final goal uses `goal_radius`,
    /// all others `subgoal_radius`.
    pub fn plan<R: Rng + ?Sized>(
        &mut self,
        obstacles: &ObstacleSet,
        rng: &mut R,
    ) -> Result<Vec<Goal>, PlanError> {
        self.check_endpoints(obstacles);
        self.roadmap = Roadmap::new();
        self.omega.clear();
        self.regrowths = 0;

        self.push_node(self.start, obstacles);
        for p in self.sample(self.params.sample_count, obstacles, rng) {
            self.push_node(p, obstacles);
        }
        self.push_node(self.end, obstacles);
        self.connect_from(0, obstacles);

        loop {
            let last = self.roadmap.len() - 1;
            let path = shortest_path(&self.roadmap, 0, last)?;
            if path.len() > 1 {
                self.path = path;
                break;
            }
            if self.regrowths >= self.params.max_regrowths {
                self.path = path;
                return Err(PlanError::Unreachable {
                    attempts: self.regrowths,
                    nodes: self.roadmap.len(),
                });
            }
            self.regrow(obstacles, rng);
        }

        info!(
            nodes = self.roadmap.len(),
            edges = self.roadmap.edge_count(),
            path_len = self.path.len(),
            regrowths = self.regrowths,
            "roadmap solved"
        );
        Ok(self.goals())
    }

    /// Goals for the current path; empty before a successful `plan`.
    pub fn goals(&self) -> Vec<Goal> {
        let n = self.path.len();
        self.path
            .iter()
            .enumerate()
            .map(|(k, v)| {
                let radius = if k + 1 == n {
                    self.params.goal_radius
                } else {
                    self.params.subgoal_radius
                };
                Goal::new(self.roadmap.position(*v), radius)
            })
            .collect()
    }

    fn regrow<R: Rng + ?Sized>(&mut self, obstacles: &ObstacleSet, rng: &mut R) {
        self.regrowths += 1;
        self.roadmap.pop_node();
        self.omega.pop();
        let first_new = self.roadmap.len();
        for p in self.sample(self.params.sample_count / 2 + 1, obstacles, rng) {
            self.push_node(p, obstacles);
        }
        self.push_node(self.end, obstacles);
        self.connect_from(first_new, obstacles);
        debug!(
            round = self.regrowths,
            nodes = self.roadmap.len(),
            "end unreachable, roadmap regrown"
        );
    }

    fn check_endpoints(&self, obstacles: &ObstacleSet) {
        for (name, p) in [("start", self.start), ("end", self.end)] {
            if !self.clear_of_statics(p, obstacles) {
                warn!(which = name, x = p.x, y = p.y, "endpoint lacks clearance from static obstacles");
            }
        }
    }

    fn clear_of_statics(&self, p: Pt2, obstacles: &ObstacleSet) -> bool {
        obstacles.statics().all(|o| {
            !o.point_inside(p)
                && distance(p, o.closest_boundary_point(p)) >= self.params.sample_clearance
        })
    }

    /// Draw `n` uniform positions and keep those clear of static obstacles.
    fn sample<R: Rng + ?Sized>(&self, n: usize, obstacles: &ObstacleSet, rng: &mut R) -> Vec<Pt2> {
        (0..n)
            .map(|_| {
                Pt2::new(
                    rng.gen_range(0.0..=self.world.width),
                    rng.gen_range(0.0..=self.world.height),
                )
            })
            .filter(|p| self.clear_of_statics(*p, obstacles))
            .collect()
    }

    fn push_node(&mut self, p: Pt2, obstacles: &ObstacleSet) {
        self.roadmap.push_node(p);
        self.omega.push(omega(p, obstacles));
    }

    /// Candidates linked to node `i`, nearest first, capped at `max_neighbors`.
    fn neighbors(&self, i: usize, obstacles: &ObstacleSet) -> Vec<(usize, f64)> {
        let p = self.roadmap.position(i);
        let reach = self.params.adjacency_radius;
        let nearby: Vec<&Obstacle> = obstacles
            .iter()
            .filter(|o| o.bounding_circle().within(p, reach))
            .collect();
        let mut found: Vec<(usize, f64)> = self
            .roadmap
            .positions()
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, q)| (j, distance(p, *q)))
            .filter(|(_, d)| *d < reach)
            .filter(|(j, _)| {
                let q = self.roadmap.position(*j);
                !nearby.iter().any(|o| o.detect_segment_collision(p, q))
            })
            .collect();
        // stable: equal distances keep index order
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.truncate(self.params.max_neighbors);
        found
    }

    fn connect_from(&mut self, first: usize, obstacles: &ObstacleSet) {
        for i in first..self.roadmap.len() {
            for (j, d) in self.neighbors(i, obstacles) {
                if j < i {
                    let w = 1000.0 * d / self.omega[i].min(self.omega[j]).max(OMEGA_FLOOR);
                    self.roadmap.add_edge(i, j, w);
                }
            }
        }
    }
}

/// Openness: summed distance from `p` to every obstacle boundary.
fn omega(p: Pt2, obstacles: &ObstacleSet) -> f64 {
    obstacles
        .iter()
        .map(|o| distance(p, o.closest_boundary_point(p)))
        .sum()
}
