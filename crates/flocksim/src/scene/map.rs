use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::{SimConfig, WorldConfig};
use crate::error::MapError;
use crate::geom::{Polygon, Pt2};
use crate::obstacle::{DynamicState, Obstacle};

/// Coordinate range used by map files on both axes.
pub const MAP_COORD_MIN: f64 = -29.0;
pub const MAP_COORD_MAX: f64 = 29.0;

/// How the polygons of a map file behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapKind {
    Static,
    Dynamic,
}

impl MapKind {
    /// `.obstacles` files hold moving obstacles; every other extension is static.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("obstacles") => MapKind::Dynamic,
            _ => MapKind::Static,
        }
    }
}

/// Linear rescale of `x` from `[in_min, in_max]` to `[out_min, out_max]`, floored.
#[inline]
pub fn map_val(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    ((x - in_min) * (out_max - out_min) / (in_max - in_min)).floor() + out_min
}

/// Map-file coordinates to world coordinates; y grows upward in the file.
pub fn to_world(x: f64, y: f64, world: WorldConfig) -> Pt2 {
    Pt2::new(
        map_val(x, MAP_COORD_MIN, MAP_COORD_MAX, 0.0, world.width),
        world.height - map_val(y, MAP_COORD_MIN, MAP_COORD_MAX, 0.0, world.height),
    )
}

/// Parse the polygons of a map file.
///
/// Line 1 holds the polygon count `N`; each of the next `N` lines is an index
/// token followed by `x y` pairs. Coordinates are truncated to integers before
/// scaling; a trailing unpaired token is ignored.
pub fn parse_polygons(text: &str, world: WorldConfig) -> Result<Vec<Polygon>, MapError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| MapError::parse(1, "empty map"))?;
    let count: usize = header
        .trim()
        .parse()
        .map_err(|_| MapError::parse(1, format!("bad polygon count {:?}", header.trim())))?;

    let mut polygons = Vec::new();
    for k in 0..count {
        let line_no = k + 2;
        let line = lines
            .next()
            .ok_or_else(|| MapError::parse(line_no, format!("expected {count} polygons, found {k}")))?;
        let coords = line
            .split_whitespace()
            .skip(1)
            .map(|tok| {
                tok.parse::<f64>()
                    .map(f64::trunc)
                    .map_err(|_| MapError::parse(line_no, format!("bad coordinate {tok:?}")))
            })
            .collect::<Result<Vec<f64>, MapError>>()?;
        let vertices = coords
            .chunks_exact(2)
            .map(|c| to_world(c[0], c[1], world))
            .collect();
        let polygon =
            Polygon::new(vertices).map_err(|e| MapError::parse(line_no, e.to_string()))?;
        polygons.push(polygon);
    }
    Ok(polygons)
}

/// Parse a map into obstacles. Dynamic obstacles use `start`/`end` as their no-go zones.
pub fn parse_map(
    text: &str,
    kind: MapKind,
    cfg: &SimConfig,
    start: Pt2,
    end: Pt2,
) -> Result<Vec<Obstacle>, MapError> {
    let polygons = parse_polygons(text, cfg.world)?;
    Ok(polygons
        .into_iter()
        .map(|p| match kind {
            MapKind::Static => Obstacle::fixed(p),
            MapKind::Dynamic => Obstacle::moving(
                p,
                DynamicState::new(&cfg.obstacles, cfg.world, start, end),
            ),
        })
        .collect())
}

/// Read and parse a map file; the kind follows the extension.
///
/// Unreadable or malformed files yield no obstacles and a warning.
pub fn load_map(path: &Path, cfg: &SimConfig, start: Pt2, end: Pt2) -> Vec<Obstacle> {
    match try_load_map(path, cfg, start, end) {
        Ok(obstacles) => {
            debug!(path = %path.display(), count = obstacles.len(), "map loaded");
            obstacles
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "map unusable, continuing without it");
            Vec::new()
        }
    }
}

pub fn try_load_map(
    path: &Path,
    cfg: &SimConfig,
    start: Pt2,
    end: Pt2,
) -> Result<Vec<Obstacle>, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text, MapKind::from_path(path), cfg, start, end)
}
