//! Probabilistic roadmap planner.
//!
//! Purpose
//! - Turn a start, an end and an obstacle set into an ordered list of circular
//!   goals the agents chase one after another.
//!
//! Model
//! - Candidates are the start, uniformly drawn samples that keep clear of the
//!   static obstacles, and the end (always last).
//! - Each candidate links to at most `max_neighbors` nearby candidates whose
//!   connecting segment crosses no obstacle. Edge weights grow with length and
//!   shrink with openness, the summed distance to every obstacle boundary, so
//!   routes through open space win.
//! - While the end is unreachable, half a batch of new samples is added in
//!   front of the end and only the new part of the map is reconnected.

mod prm;

use serde::Serialize;

use crate::geom::{distance, Pt2};

pub use prm::{Prm, OMEGA_FLOOR};

/// Circular target region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Goal {
    pub position: Pt2,
    pub radius: f64,
}

impl Goal {
    pub fn new(position: Pt2, radius: f64) -> Self {
        Self { position, radius }
    }

    #[inline]
    pub fn reached_by(&self, p: Pt2) -> bool {
        distance(self.position, p) <= self.radius
    }
}

#[cfg(test)]
mod tests;
