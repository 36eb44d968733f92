use rand::Rng;
use serde::Serialize;

use super::{Boundary, Obstacle};
use crate::geom::{distance, Polygon, Pt2};

/// All obstacles of a run, in tick order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        let mut set = Self { obstacles };
        set.refresh_snapshots();
        set
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
        self.refresh_snapshots();
    }

    pub fn extend(&mut self, more: impl IntoIterator<Item = Obstacle>) {
        self.obstacles.extend(more);
        self.refresh_snapshots();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn statics(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| !o.is_dynamic())
    }

    pub fn dynamic_count(&self) -> usize {
        self.obstacles.iter().filter(|o| o.is_dynamic()).count()
    }

    pub fn any_contains(&self, p: Pt2) -> bool {
        self.obstacles.iter().any(|o| o.point_inside(p))
    }

    /// Nearest boundary point over all obstacles, with its distance.
    pub fn nearest_boundary_point(&self, p: Pt2) -> Option<(Pt2, f64)> {
        self.obstacles
            .iter()
            .map(|o| {
                let q = o.closest_boundary_point(p);
                (q, distance(p, q))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Give every dynamic obstacle a copy of the other polygons as they are now.
    pub fn refresh_snapshots(&mut self) {
        let polygons: Vec<Polygon> = self.obstacles.iter().map(|o| o.polygon().clone()).collect();
        for (i, o) in self.obstacles.iter_mut().enumerate() {
            if let Some(m) = o.motion_mut() {
                let siblings = polygons
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, p)| p.clone())
                    .collect();
                m.set_siblings(siblings);
            }
        }
    }

    /// Obstacle phase of a tick: snapshot, then move dynamic obstacles in index order.
    ///
    /// Returns the number of forced turns taken this tick.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.dynamic_count() == 0 {
            return 0;
        }
        self.refresh_snapshots();
        let mut turns = 0;
        for o in self.obstacles.iter_mut() {
            if let Some(report) = o.advance(rng) {
                if report.turned.is_some() {
                    turns += 1;
                }
            }
        }
        turns
    }
}

impl<'a> IntoIterator for &'a ObstacleSet {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.obstacles.iter()
    }
}

impl FromIterator<Obstacle> for ObstacleSet {
    fn from_iter<T: IntoIterator<Item = Obstacle>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
