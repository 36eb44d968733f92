use serde::Serialize;

use super::kernel::{
    closest_point_on_segment, distance, point_in_polygon, polygon_edges, segments_intersect, Pt2,
};
use crate::error::GeomError;

/// Centroid plus max vertex distance: a cheap enclosing circle used for pruning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingCircle {
    pub center: Pt2,
    pub radius: f64,
}

impl BoundingCircle {
    /// Is `p` at most `margin` outside the circle (measured from the center)?
    #[inline]
    pub fn within(&self, p: Pt2, margin: f64) -> bool {
        distance(p, self.center) <= margin + self.radius
    }
}

/// Simple polygon with at least three vertices.
///
/// The bounding circle is cached at construction and moved along with the
/// vertices on translation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Pt2>,
    circle: BoundingCircle,
}

impl Polygon {
    pub fn new(vertices: Vec<Pt2>) -> Result<Self, GeomError> {
        if vertices.len() < 3 {
            return Err(GeomError::TooFewVertices {
                count: vertices.len(),
            });
        }
        let circle = estimate_circle(&vertices);
        Ok(Self { vertices, circle })
    }

    /// Axis-aligned rectangle from two opposite corners.
    pub fn rect(min: Pt2, max: Pt2) -> Self {
        let vertices = vec![
            Pt2::new(min.x, min.y),
            Pt2::new(max.x, min.y),
            Pt2::new(max.x, max.y),
            Pt2::new(min.x, max.y),
        ];
        let circle = estimate_circle(&vertices);
        Self { vertices, circle }
    }

    #[inline]
    pub fn vertices(&self) -> &[Pt2] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = (Pt2, Pt2)> + '_ {
        polygon_edges(&self.vertices)
    }

    /// Arithmetic mean of the vertices.
    #[inline]
    pub fn centroid(&self) -> Pt2 {
        self.circle.center
    }

    #[inline]
    pub fn bounding_circle(&self) -> BoundingCircle {
        self.circle
    }

    #[inline]
    pub fn contains(&self, p: Pt2) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    /// Closest point on the boundary; ties go to the first edge in `edges()` order.
    pub fn closest_point(&self, p: Pt2) -> Pt2 {
        let mut best = self.vertices[0];
        let mut best_d = f64::INFINITY;
        for (a, b) in self.edges() {
            let q = closest_point_on_segment(a, b, p);
            let d = distance(p, q);
            if d < best_d {
                best_d = d;
                best = q;
            }
        }
        best
    }

    /// Does any boundary edge properly cross segment `ab`?
    pub fn crosses_segment(&self, a: Pt2, b: Pt2) -> bool {
        self.edges().any(|(p, q)| segments_intersect(p, q, a, b))
    }

    pub(crate) fn translate(&mut self, v: Pt2) {
        for p in self.vertices.iter_mut() {
            *p += v;
        }
        self.circle.center += v;
    }
}

fn estimate_circle(vertices: &[Pt2]) -> BoundingCircle {
    let sum = vertices.iter().fold(Pt2::zeros(), |acc, p| acc + p);
    let center = sum / vertices.len() as f64;
    let radius = vertices
        .iter()
        .map(|p| distance(*p, center))
        .fold(0.0, f64::max);
    BoundingCircle { center, radius }
}
