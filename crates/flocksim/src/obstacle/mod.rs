//! Polygon obstacles: static walls and bouncing movers.
//!
//! Purpose
//! - One capability trait (`Boundary`) that the planner and the agents query,
//!   regardless of what kind of obstacle sits behind it.
//! - `Obstacle` tags a `Polygon` as static or dynamic; dynamic ones carry a
//!   `DynamicState` and move once per tick through `ObstacleSet::advance`.
//!
//! Sibling awareness
//! - A dynamic obstacle checks its vertices against a snapshot of the other
//!   obstacles' polygons. The snapshot is rebuilt from the tick-start state at
//!   the beginning of every obstacle phase and never includes the obstacle itself.

mod dynamic;
mod set;

use rand::Rng;
use serde::Serialize;

use crate::geom::{BoundingCircle, Polygon, Pt2};

pub use dynamic::{Direction, DynamicState, Rebound, StepReport};
pub use set::ObstacleSet;

/// Queries every obstacle kind answers.
pub trait Boundary {
    fn point_inside(&self, p: Pt2) -> bool;
    fn closest_boundary_point(&self, p: Pt2) -> Pt2;
    /// True iff a boundary edge properly crosses segment `ab`.
    fn detect_segment_collision(&self, a: Pt2, b: Pt2) -> bool;
    fn bounding_circle(&self) -> BoundingCircle;
}

impl Boundary for Polygon {
    #[inline]
    fn point_inside(&self, p: Pt2) -> bool {
        self.contains(p)
    }
    #[inline]
    fn closest_boundary_point(&self, p: Pt2) -> Pt2 {
        self.closest_point(p)
    }
    #[inline]
    fn detect_segment_collision(&self, a: Pt2, b: Pt2) -> bool {
        self.crosses_segment(a, b)
    }
    #[inline]
    fn bounding_circle(&self) -> BoundingCircle {
        Polygon::bounding_circle(self)
    }
}

#[derive(Clone, Debug, Serialize)]
pub enum ObstacleKind {
    Static,
    Dynamic(DynamicState),
}

#[derive(Clone, Debug, Serialize)]
pub struct Obstacle {
    polygon: Polygon,
    kind: ObstacleKind,
}

impl Obstacle {
    pub fn fixed(polygon: Polygon) -> Self {
        Self {
            polygon,
            kind: ObstacleKind::Static,
        }
    }

    pub fn moving(polygon: Polygon, motion: DynamicState) -> Self {
        Self {
            polygon,
            kind: ObstacleKind::Dynamic(motion),
        }
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn kind(&self) -> &ObstacleKind {
        &self.kind
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, ObstacleKind::Dynamic(_))
    }

    pub fn motion(&self) -> Option<&DynamicState> {
        match &self.kind {
            ObstacleKind::Dynamic(m) => Some(m),
            ObstacleKind::Static => None,
        }
    }

    pub fn motion_mut(&mut self) -> Option<&mut DynamicState> {
        match &mut self.kind {
            ObstacleKind::Dynamic(m) => Some(m),
            ObstacleKind::Static => None,
        }
    }

    /// Move one tick. Static obstacles report `None`.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<StepReport> {
        match &mut self.kind {
            ObstacleKind::Dynamic(m) => Some(m.translate(&mut self.polygon, rng)),
            ObstacleKind::Static => None,
        }
    }
}

impl Boundary for Obstacle {
    #[inline]
    fn point_inside(&self, p: Pt2) -> bool {
        self.polygon.contains(p)
    }
    #[inline]
    fn closest_boundary_point(&self, p: Pt2) -> Pt2 {
        self.polygon.closest_point(p)
    }
    #[inline]
    fn detect_segment_collision(&self, a: Pt2, b: Pt2) -> bool {
        self.polygon.crosses_segment(a, b)
    }
    #[inline]
    fn bounding_circle(&self) -> BoundingCircle {
        self.polygon.bounding_circle()
    }
}
