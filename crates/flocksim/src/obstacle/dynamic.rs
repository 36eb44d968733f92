//! Bounce model for moving obstacles.
//!
//! Model
//! - Velocity is axis-aligned with exactly one non-zero component.
//! - Each tick: scan vertices for contact (sibling polygon or no-go zone) or
//!   world-edge proximity and reverse on the first hit; turn when the
//!   displacement budget is spent; then translate.
//! - Displacement grows by the travel distance of the last translated vertex
//!   only. All vertices move by the same vector, so this equals the speed.

use rand::Rng;
use serde::Serialize;

use crate::config::{ObstacleConfig, WorldConfig};
use crate::geom::{distance, Polygon, Pt2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a selector in `[0, 1]` to a direction in quarters: up, down, left, right.
    pub fn from_selector(s: f64) -> Self {
        if s <= 0.25 {
            Direction::Up
        } else if s <= 0.5 {
            Direction::Down
        } else if s <= 0.75 {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Replacement used when a pick repeats the current direction.
    pub fn alternate(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Right => Direction::Down,
        }
    }

    pub fn of_velocity(v: Pt2) -> Option<Self> {
        if v.x > 0.0 {
            Some(Direction::Right)
        } else if v.x < 0.0 {
            Some(Direction::Left)
        } else if v.y > 0.0 {
            Some(Direction::Up)
        } else if v.y < 0.0 {
            Some(Direction::Down)
        } else {
            None
        }
    }

    pub fn velocity(self, speed: f64) -> Pt2 {
        match self {
            Direction::Up => Pt2::new(0.0, speed),
            Direction::Down => Pt2::new(0.0, -speed),
            Direction::Left => Pt2::new(-speed, 0.0),
            Direction::Right => Pt2::new(speed, 0.0),
        }
    }
}

/// What made the obstacle reverse during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Rebound {
    Contact,
    WorldEdge,
}

/// Outcome of one `translate` call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepReport {
    pub rebound: Option<Rebound>,
    /// Set when the displacement budget forced a turn this tick.
    pub turned: Option<Direction>,
    pub displacement: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct DynamicState {
    velocity: Pt2,
    displacement: f64,
    max_displacement: f64,
    nogo: [Pt2; 2],
    direction_changes: usize,
    #[serde(skip)]
    params: ObstacleConfig,
    #[serde(skip)]
    world: WorldConfig,
    #[serde(skip)]
    siblings: Vec<Polygon>,
}

impl DynamicState {
    /// Starts moving right at the configured speed; `start`/`end` are the no-go centers.
    pub fn new(params: &ObstacleConfig, world: WorldConfig, start: Pt2, end: Pt2) -> Self {
        Self {
            velocity: Direction::Right.velocity(params.speed),
            displacement: 0.0,
            max_displacement: params.max_displacement,
            nogo: [start, end],
            direction_changes: 0,
            params: params.clone(),
            world,
            siblings: Vec::new(),
        }
    }

    pub fn with_direction(mut self, d: Direction) -> Self {
        self.velocity = d.velocity(self.speed());
        self
    }

    #[inline]
    pub fn velocity(&self) -> Pt2 {
        self.velocity
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.x.abs().max(self.velocity.y.abs())
    }

    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        Direction::of_velocity(self.velocity)
    }

    #[inline]
    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    #[inline]
    pub fn direction_changes(&self) -> usize {
        self.direction_changes
    }

    #[inline]
    pub fn nogo_zones(&self) -> [Pt2; 2] {
        self.nogo
    }

    pub fn siblings(&self) -> &[Polygon] {
        &self.siblings
    }

    pub(crate) fn set_siblings(&mut self, siblings: Vec<Polygon>) {
        self.siblings = siblings;
    }

    fn touches_sibling(&self, v: Pt2) -> bool {
        let clearance = self.params.contact_clearance;
        self.siblings.iter().any(|s| {
            s.bounding_circle().within(v, clearance)
                && (s.contains(v) || distance(v, s.closest_point(v)) <= clearance)
        })
    }

    fn in_nogo_zone(&self, v: Pt2) -> bool {
        self.nogo
            .iter()
            .any(|z| distance(*z, v) < self.params.nogo_radius)
    }

    fn near_world_edge(&self, v: Pt2) -> bool {
        let m = self.params.boundary_margin;
        let x_hit = v.x + m > self.world.width || v.x < m;
        let y_hit = v.y + m > self.world.height || v.y < m;
        x_hit || y_hit
    }

    /// Advance `polygon` by one tick.
    pub fn translate<R: Rng + ?Sized>(&mut self, polygon: &mut Polygon, rng: &mut R) -> StepReport {
        let mut rebound = None;
        for &v in polygon.vertices() {
            if self.touches_sibling(v) || self.in_nogo_zone(v) {
                self.displacement = 0.0;
                self.velocity = -self.velocity;
                rebound = Some(Rebound::Contact);
                break;
            }
            if self.near_world_edge(v) {
                self.displacement = self.params.boundary_rebound;
                self.velocity = -self.velocity;
                rebound = Some(Rebound::WorldEdge);
                break;
            }
        }

        let turned = if self.displacement >= self.max_displacement {
            self.change_direction(true, None, rng)
        } else {
            None
        };

        let Some(&before) = polygon.vertices().last() else {
            return StepReport {
                rebound,
                turned,
                displacement: self.displacement,
            };
        };
        polygon.translate(self.velocity);
        if let Some(&after) = polygon.vertices().last() {
            self.displacement += distance(before, after);
        }
        tracing::trace!(
            displacement = self.displacement,
            ?rebound,
            ?turned,
            "obstacle step"
        );
        StepReport {
            rebound,
            turned,
            displacement: self.displacement,
        }
    }

    /// Maybe turn: always when `forced`, otherwise on a fair coin flip.
    ///
    /// `selector` picks the direction (see `Direction::from_selector`); `None`
    /// draws it from `rng`. A pick equal to the current direction is replaced by
    /// `Direction::alternate`. Displacement resets to 0 whether or not a turn
    /// happened. Returns the new direction when one was applied.
    pub fn change_direction<R: Rng + ?Sized>(
        &mut self,
        forced: bool,
        selector: Option<f64>,
        rng: &mut R,
    ) -> Option<Direction> {
        let turn = forced || rng.gen::<f64>() > 0.5;
        let mut applied = None;
        if turn {
            let s = selector.unwrap_or_else(|| rng.gen::<f64>());
            let mut next = Direction::from_selector(s);
            if Some(next) == self.direction() {
                next = next.alternate();
            }
            self.velocity = next.velocity(self.speed());
            self.direction_changes += 1;
            applied = Some(next);
        }
        self.displacement = 0.0;
        applied
    }
}
