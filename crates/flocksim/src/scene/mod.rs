//! Scene assembly: map files, generated obstacles, presets and spawn layout.
//!
//! Map files
//! - First line: polygon count. Each following line: an index token, then
//!   `x y` pairs in `[-29, 29]` that are scaled onto the world with y flipped.
//! - `.obstacles` files describe moving obstacles, anything else static ones.
//! - `load_map` never fails: unreadable or malformed files produce an empty
//!   list and a warning, so a bad map degrades to open space.

mod autogen;
mod map;

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use crate::config::SimConfig;
use crate::geom::Pt2;
use crate::obstacle::ObstacleSet;

pub use autogen::autogen_obstacles;
pub use map::{
    load_map, map_val, parse_map, parse_polygons, to_world, try_load_map, MapKind,
    MAP_COORD_MAX, MAP_COORD_MIN,
};

/// Named start/end pair for one of the bundled maps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePreset {
    pub name: &'static str,
    /// File name relative to the maps directory.
    pub map: &'static str,
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl ScenePreset {
    #[inline]
    pub fn start(&self) -> Pt2 {
        Pt2::new(self.start.0, self.start.1)
    }

    #[inline]
    pub fn end(&self) -> Pt2 {
        Pt2::new(self.end.0, self.end.1)
    }

    pub fn map_path(&self, maps_dir: &Path) -> PathBuf {
        maps_dir.join(self.map)
    }
}

pub const PRESETS: &[ScenePreset] = &[
    ScenePreset { name: "scene1", map: "scene1.map", start: (50.0, 50.0), end: (980.0, 30.0) },
    ScenePreset { name: "scene2", map: "scene2.map", start: (494.0, 213.0), end: (404.0, 20.0) },
    ScenePreset { name: "scene3", map: "scene3.map", start: (356.0, 42.0), end: (852.0, 450.0) },
    ScenePreset { name: "empty", map: "empty.map", start: (50.0, 50.0), end: (980.0, 590.0) },
    ScenePreset { name: "s", map: "s.map", start: (0.0, 80.0), end: (980.0, 90.0) },
    ScenePreset { name: "maze", map: "maze.map", start: (50.0, 50.0), end: (950.0, 30.0) },
    ScenePreset { name: "maze2", map: "maze2.map", start: (50.0, 70.0), end: (950.0, 30.0) },
    ScenePreset { name: "great_divide", map: "great_divide.map", start: (50.0, 70.0), end: (950.0, 500.0) },
    ScenePreset { name: "random", map: "random.map", start: (60.0, 60.0), end: (950.0, 360.0) },
    ScenePreset { name: "hurdles", map: "hurdles.map", start: (60.0, 270.0), end: (950.0, 270.0) },
];

pub fn preset(name: &str) -> Option<&'static ScenePreset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Start positions for a flock of `n`: a square grid at `start` with a
/// spacing of three agent radii, filled row by row.
pub fn spawn_grid(start: Pt2, n: usize, radius: f64) -> Vec<Pt2> {
    let cols = (n as f64).sqrt().ceil().max(1.0) as usize;
    let step = 3.0 * radius;
    (0..n)
        .map(|i| start + Pt2::new((i % cols) as f64, (i / cols) as f64) * step)
        .collect()
}

/// Where the obstacles of a run come from.
#[derive(Clone, Debug, Default)]
pub struct SceneSources {
    /// Static map file.
    pub map: Option<PathBuf>,
    /// `.obstacles` file with moving obstacles.
    pub dynamic: Option<PathBuf>,
    /// Number of square moving obstacles to generate.
    pub generated: usize,
}

/// Everything the simulation needs besides the configuration.
#[derive(Clone, Debug)]
pub struct Scene {
    pub start: Pt2,
    pub end: Pt2,
    pub obstacles: ObstacleSet,
}

impl Scene {
    pub fn open(start: Pt2, end: Pt2) -> Self {
        Self {
            start,
            end,
            obstacles: ObstacleSet::default(),
        }
    }

    /// Static map first, then moving obstacles from file, then generated ones.
    /// Generation avoids everything loaded before it.
    pub fn assemble<R: Rng + ?Sized>(
        start: Pt2,
        end: Pt2,
        sources: &SceneSources,
        cfg: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let mut obstacles = ObstacleSet::default();
        if let Some(path) = &sources.map {
            obstacles.extend(load_map(path, cfg, start, end));
        }
        if let Some(path) = &sources.dynamic {
            obstacles.extend(load_map(path, cfg, start, end));
        }
        if sources.generated > 0 {
            let extra = autogen_obstacles(sources.generated, &obstacles, cfg, start, end, rng);
            obstacles.extend(extra);
        }
        info!(
            obstacles = obstacles.len(),
            dynamic = obstacles.dynamic_count(),
            "scene assembled"
        );
        Self {
            start,
            end,
            obstacles,
        }
    }
}
