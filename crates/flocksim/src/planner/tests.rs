use super::*;
use crate::config::SimConfig;
use crate::error::PlanError;
use crate::geom::Polygon;
use crate::obstacle::{Boundary, Obstacle, ObstacleSet};
use nalgebra::vector;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn plan_with(
    cfg: &SimConfig,
    start: Pt2,
    end: Pt2,
    obstacles: &ObstacleSet,
    seed: u64,
) -> (Prm, Result<Vec<Goal>, PlanError>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut prm = Prm::new(start, end, cfg);
    let goals = prm.plan(obstacles, &mut rng);
    (prm, goals)
}

#[test]
fn goal_reach_is_inclusive() {
    let g = Goal::new(vector![0.0, 0.0], 5.0);
    assert!(g.reached_by(vector![3.0, 4.0]));
    assert!(!g.reached_by(vector![3.0, 4.1]));
}

#[test]
fn empty_world_reaches_end() {
    let cfg = SimConfig::default();
    let end = vector![950.0, 30.0];
    let (prm, goals) = plan_with(&cfg, vector![50.0, 50.0], end, &ObstacleSet::default(), 3);
    let goals = goals.unwrap();
    assert!(goals.len() >= 2);
    assert_eq!(goals[0].position, vector![50.0, 50.0]);
    let last = goals.last().unwrap();
    assert_eq!(last.position, end);
    assert_eq!(last.radius, cfg.planner.goal_radius);
    assert!(goals[..goals.len() - 1]
        .iter()
        .all(|g| g.radius == cfg.planner.subgoal_radius));
    assert_eq!(prm.path().len(), goals.len());
    assert_eq!(prm.path()[0], 0);
    assert_eq!(*prm.path().last().unwrap(), prm.roadmap().len() - 1);
    let waypoints: Vec<Pt2> = goals.iter().map(|g| g.position).collect();
    assert_eq!(prm.path_positions(), waypoints);
}

#[test]
fn consecutive_goals_are_roadmap_edges() {
    let cfg = SimConfig::default();
    let (prm, goals) = plan_with(
        &cfg,
        vector![50.0, 50.0],
        vector![950.0, 30.0],
        &ObstacleSet::default(),
        11,
    );
    goals.unwrap();
    for e in prm.path().windows(2) {
        let w = prm.roadmap().weight(e[0], e[1]).unwrap();
        assert!(w >= 0.0);
        let d = distance(prm.roadmap().position(e[0]), prm.roadmap().position(e[1]));
        assert!(d < cfg.planner.adjacency_radius);
    }
}

#[test]
fn central_block_is_never_crossed() {
    let cfg = SimConfig::default();
    let block = Polygon::rect(vector![400.0, 100.0], vector![600.0, 500.0]);
    let obstacles = ObstacleSet::new(vec![Obstacle::fixed(block.clone())]);
    let (prm, goals) = plan_with(&cfg, vector![50.0, 300.0], vector![950.0, 300.0], &obstacles, 5);
    let goals = goals.unwrap();
    assert!(goals.len() >= 3);
    let map = prm.roadmap();
    for (a, b, w) in map.edges() {
        assert!(
            !block.crosses_segment(map.position(a), map.position(b)),
            "edge {a}-{b} crosses the block"
        );
        assert!(w.is_finite() && w >= 0.0);
    }
    for p in map.positions().iter().skip(1).take(map.len() - 2) {
        assert!(!block.contains(*p));
        assert!(distance(*p, block.closest_point(*p)) >= cfg.planner.sample_clearance);
    }
}

#[test]
fn same_seed_same_path() {
    let cfg = SimConfig::default();
    let obstacles = ObstacleSet::new(vec![Obstacle::fixed(Polygon::rect(
        vector![300.0, 0.0],
        vector![350.0, 400.0],
    ))]);
    let (a, ga) = plan_with(&cfg, vector![50.0, 50.0], vector![950.0, 300.0], &obstacles, 21);
    let (b, gb) = plan_with(&cfg, vector![50.0, 50.0], vector![950.0, 300.0], &obstacles, 21);
    assert_eq!(ga.unwrap(), gb.unwrap());
    assert_eq!(a.path(), b.path());
    assert_eq!(a.roadmap().positions(), b.roadmap().positions());
}

#[test]
fn regrows_until_connected() {
    let mut cfg = SimConfig::default();
    cfg.world.width = 200.0;
    cfg.world.height = 100.0;
    cfg.planner.sample_count = 0;
    cfg.planner.max_regrowths = 1_000;
    // 180 apart with adjacency 80: the bare start/end pair cannot connect
    let (prm, goals) = plan_with(
        &cfg,
        vector![10.0, 50.0],
        vector![190.0, 50.0],
        &ObstacleSet::default(),
        8,
    );
    let goals = goals.unwrap();
    assert!(prm.regrowths() >= 2);
    assert!(goals.len() >= 3);
    assert_eq!(prm.roadmap().position(0), vector![10.0, 50.0]);
    assert_eq!(
        prm.roadmap().position(prm.roadmap().len() - 1),
        vector![190.0, 50.0]
    );
}

#[test]
fn enclosed_end_is_unreachable() {
    let mut cfg = SimConfig::default();
    cfg.planner.sample_count = 40;
    cfg.planner.max_regrowths = 3;
    let cage = Polygon::rect(vector![800.0, 200.0], vector![900.0, 300.0]);
    let obstacles = ObstacleSet::new(vec![Obstacle::fixed(cage)]);
    let (prm, goals) = plan_with(&cfg, vector![50.0, 50.0], vector![850.0, 250.0], &obstacles, 1);
    match goals {
        Err(PlanError::Unreachable { attempts, nodes }) => {
            assert_eq!(attempts, 3);
            assert_eq!(nodes, prm.roadmap().len());
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
    assert_eq!(prm.path().len(), 1);
}

#[test]
fn replanning_starts_fresh() {
    let cfg = SimConfig::default();
    let mut rng = StdRng::seed_from_u64(2);
    let mut prm = Prm::new(vector![50.0, 50.0], vector![950.0, 30.0], &cfg);
    prm.plan(&ObstacleSet::default(), &mut rng).unwrap();
    prm.plan(&ObstacleSet::default(), &mut rng).unwrap();
    assert!(prm.roadmap().len() <= cfg.planner.sample_count + 2 + prm.regrowths() * (cfg.planner.sample_count / 2 + 1));
}

/// Summed boundary distance, recomputed outside the planner.
fn openness(p: Pt2, obstacles: &ObstacleSet) -> f64 {
    obstacles
        .iter()
        .map(|o| distance(p, o.closest_boundary_point(p)))
        .sum()
}

#[test]
fn edge_weights_follow_length_over_openness() {
    let cfg = SimConfig::default();
    let block = Polygon::rect(vector![400.0, 200.0], vector![600.0, 400.0]);
    let obstacles = ObstacleSet::new(vec![Obstacle::fixed(block)]);
    let (prm, _) = plan_with(&cfg, vector![60.0, 300.0], vector![940.0, 300.0], &obstacles, 4);
    let map = prm.roadmap();
    assert!(map.edge_count() > 0);
    let mut uneven = 0;
    for (a, b, w) in map.edges() {
        let (pa, pb) = (map.position(a), map.position(b));
        let (oa, ob) = (openness(pa, &obstacles), openness(pb, &obstacles));
        if (oa - ob).abs() > 1.0 {
            uneven += 1;
        }
        let expected = 1000.0 * distance(pa, pb) / oa.min(ob).max(OMEGA_FLOOR);
        assert!(
            (w - expected).abs() <= 1e-9 * expected.max(1.0),
            "edge ({a}, {b}): {w} vs {expected}"
        );
    }
    // some edges join nodes of different openness
    assert!(uneven > 0);
}

#[test]
fn each_node_links_only_to_its_nearest_candidates() {
    let mut cfg = SimConfig::default();
    cfg.world.width = 100.0;
    cfg.world.height = 100.0;
    cfg.planner.sample_count = 30;
    cfg.planner.max_neighbors = 2;
    // no regrowth: the roadmap stays exactly as first connected
    cfg.planner.max_regrowths = 0;
    let (prm, _) = plan_with(
        &cfg,
        vector![10.0, 10.0],
        vector![90.0, 90.0],
        &ObstacleSet::default(),
        6,
    );
    let map = prm.roadmap();
    assert_eq!(prm.regrowths(), 0);
    assert_eq!(map.len(), 32);
    for i in 0..map.len() {
        let p = map.position(i);
        let mut candidates: Vec<(usize, f64)> = (0..map.len())
            .filter(|j| *j != i)
            .map(|j| (j, distance(p, map.position(j))))
            .filter(|(_, d)| *d < cfg.planner.adjacency_radius)
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        let nearest: Vec<usize> = candidates.iter().take(2).map(|(j, _)| *j).collect();
        let lower: Vec<usize> = map
            .edges()
            .filter(|(_, b, _)| *b == i)
            .map(|(a, _, _)| a)
            .collect();
        assert!(lower.len() <= 2, "node {i} has {} lower edges", lower.len());
        assert!(
            lower.iter().all(|j| nearest.contains(j)),
            "node {i}: {lower:?} not within {nearest:?}"
        );
    }
}
