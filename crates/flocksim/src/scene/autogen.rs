use rand::Rng;
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::geom::{distance, Polygon, Pt2};
use crate::obstacle::{Boundary, DynamicState, Obstacle, ObstacleSet};

/// Distance between the world edge and the range of top-left corners.
const EDGE_INSET: i64 = 40;

/// Place up to `count` square dynamic obstacles at random free spots.
///
/// A placement is kept only if every vertex lies outside `existing`, more
/// than `autogen_clearance` from any existing boundary, at least
/// `autogen_nogo_radius` from `start` and `end`, and at least
/// `autogen_spacing` from every vertex placed earlier. Rejections count
/// against `autogen_max_attempts`; when that runs out fewer squares come back.
pub fn autogen_obstacles<R: Rng + ?Sized>(
    count: usize,
    existing: &ObstacleSet,
    cfg: &SimConfig,
    start: Pt2,
    end: Pt2,
    rng: &mut R,
) -> Vec<Obstacle> {
    let p = &cfg.obstacles;
    let side = p.autogen_size;
    let x_max = cfg.world.width as i64 - EDGE_INSET;
    let y_max = cfg.world.height as i64 - EDGE_INSET;
    if count == 0 {
        return Vec::new();
    }
    if x_max < EDGE_INSET || y_max < EDGE_INSET {
        warn!(count, "world too small for generated obstacles");
        return Vec::new();
    }

    let valid = |v: Pt2, placed: &[Polygon]| -> bool {
        let clear = existing.iter().all(|o| {
            !o.point_inside(v) && distance(v, o.closest_boundary_point(v)) > p.autogen_clearance
        });
        let away_from_ends =
            distance(v, start) >= p.autogen_nogo_radius && distance(v, end) >= p.autogen_nogo_radius;
        let spaced = placed
            .iter()
            .flat_map(|q| q.vertices())
            .all(|u| distance(v, *u) >= p.autogen_spacing);
        clear && away_from_ends && spaced
    };

    let mut placed: Vec<Polygon> = Vec::with_capacity(count);
    let mut rejected = 0;
    while placed.len() < count && rejected < p.autogen_max_attempts {
        let x = rng.gen_range(EDGE_INSET..=x_max) as f64;
        let y = rng.gen_range(EDGE_INSET..=y_max) as f64;
        // (x, y) is the top-left corner
        let square = Polygon::rect(Pt2::new(x, y - side), Pt2::new(x + side, y));
        if square.vertices().iter().all(|v| valid(*v, &placed)) {
            placed.push(square);
        } else {
            rejected += 1;
        }
    }
    if placed.len() < count {
        warn!(
            requested = count,
            placed = placed.len(),
            "gave up placing generated obstacles"
        );
    } else {
        debug!(placed = placed.len(), rejected, "generated obstacles placed");
    }

    placed
        .into_iter()
        .map(|poly| Obstacle::moving(poly, DynamicState::new(p, cfg.world, start, end)))
        .collect()
}
