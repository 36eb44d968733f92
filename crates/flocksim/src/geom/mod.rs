//! 2D geometry kernel.
//!
//! Purpose
//! - Pure predicates and projections (`kernel`) plus the `Polygon` type that
//!   obstacles and the planner build on.
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>` (`Pt2`); world units are screen-like
//!   (x right, y up, origin at a corner).
//! - Polygons are closed implicitly: the last vertex connects back to the first.
//! - Degenerate inputs (zero-length segments, vertex-aligned rays) are handled
//!   in place and never reported as errors.

mod kernel;
mod polygon;

pub use kernel::{
    closest_point_on_segment, distance, point_in_polygon, polygon_edges, segments_intersect, Pt2,
    RAY_EPS,
};
pub use polygon::{BoundingCircle, Polygon};

#[cfg(test)]
mod tests;
