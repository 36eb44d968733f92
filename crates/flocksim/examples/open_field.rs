//! Fly a small flock across an open field and print a line per 50 ticks.
//!
//! Usage:
//!   cargo run -p flocksim --example open_field -- [flock] [seed]

use flocksim::scene::Scene;
use flocksim::sim::{Discard, Simulation, StatsSink, TickStats};
use flocksim::SimConfig;
use nalgebra::vector;
use rand::{rngs::StdRng, SeedableRng};

struct EveryFifty;

impl StatsSink for EveryFifty {
    fn record(&mut self, s: &TickStats) {
        if s.step % 50 == 0 {
            println!(
                "step {:>4}  arrived {:>3}  spacing {:>7.2}  nearest {:>6.2}  stuck {}",
                s.step, s.arrived, s.mean_distance, s.mean_nearest, s.stuck_total
            );
        }
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let flock = args.next().and_then(|a| a.parse().ok()).unwrap_or(20);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let cfg = SimConfig {
        seed,
        ..SimConfig::default()
    };
    let scene = Scene::open(vector![50.0, 50.0], vector![950.0, 550.0]);
    let mut sim = match Simulation::new(&cfg, scene, flock, StdRng::seed_from_u64(seed)) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("planning failed: {err}");
            return;
        }
    };
    println!("{} goals, {} roadmap nodes", sim.goals().len(), sim.planner().roadmap().len());
    let summary = sim.run(&mut Discard, &mut EveryFifty, |_| false);
    println!(
        "stopped after {} ticks ({:?}): {}/{} arrived",
        summary.ticks, summary.reason, summary.arrived, summary.flock
    );
}
