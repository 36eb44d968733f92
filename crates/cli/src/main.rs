mod output;
mod provenance;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flocksim::prelude::*;
use flocksim::scene::{self, Scene, SceneSources};
use flocksim::sim::Discard;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use output::FrameWriter;
use provenance::{read_sidecar, write_sidecar, RunRecord};

#[derive(Parser)]
#[command(name = "flocksim")]
#[command(about = "Plan a route with a probabilistic roadmap and fly a flock along it")]
struct Cmd {
    /// Free-form run tag; propagated to provenance and logs
    #[arg(long, global = true)]
    tag: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone, Debug)]
struct SceneArgs {
    /// Built-in scene preset (see `flocksim scenes`)
    #[arg(long, conflicts_with_all = ["map", "start", "end"])]
    scene: Option<String>,
    /// Map file; `.obstacles` files yield moving obstacles
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long, value_parser = parse_point)]
    start: Option<(f64, f64)>,
    #[arg(long, value_parser = parse_point)]
    end: Option<(f64, f64)>,
    /// Directory holding the preset map files
    #[arg(long, default_value = "maps")]
    maps_dir: PathBuf,
    /// Extra `.obstacles` file with moving obstacles
    #[arg(long)]
    dynamic: Option<PathBuf>,
    /// Number of square moving obstacles to generate
    #[arg(long, default_value_t = 0)]
    auto_obstacles: usize,
}

#[derive(Args, Clone, Debug)]
struct ConfigArgs {
    /// JSON configuration; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Tick limit
    #[arg(long)]
    ticks: Option<usize>,
    /// PRM sample count
    #[arg(long)]
    samples: Option<usize>,
}

#[derive(Subcommand)]
enum Action {
    /// Plan, then simulate the flock until it arrives or the tick limit hits
    Run {
        #[command(flatten)]
        scene: SceneArgs,
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, default_value_t = 30)]
        flock: usize,
        /// Per-tick stats table (.csv or .parquet)
        #[arg(long)]
        stats: Option<PathBuf>,
        /// JSON-lines frame dump
        #[arg(long)]
        frames: Option<PathBuf>,
        /// Stop once this many agents have arrived
        #[arg(long)]
        stop_after_arrived: Option<usize>,
    },
    /// Run only the planner and print the goal list as JSON
    Plan {
        #[command(flatten)]
        scene: SceneArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List the built-in scene presets
    Scenes,
    /// Print a small provenance JSON block, optionally summarizing a stats table
    Report {
        #[arg(long)]
        stats: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Run {
            scene,
            config,
            flock,
            stats,
            frames,
            stop_after_arrived,
        } => run(
            &scene,
            &config,
            flock,
            stats.as_deref(),
            frames.as_deref(),
            stop_after_arrived,
            cmd.tag,
        ),
        Action::Plan { scene, config } => plan(&scene, &config),
        Action::Scenes => scenes(),
        Action::Report { stats } => report(stats.as_deref(), cmd.tag),
    }
}

/// Parse `x,y` into a coordinate pair.
fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(format!("non-finite point {s:?}"));
    }
    Ok((x, y))
}

fn load_config(args: &ConfigArgs) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<SimConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        cfg.max_ticks = ticks;
    }
    if let Some(samples) = args.samples {
        cfg.planner.sample_count = samples;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the start, end and obstacle sources of a run.
fn resolve_scene(args: &SceneArgs) -> Result<(Pt2, Pt2, SceneSources)> {
    let mut sources = SceneSources {
        map: None,
        dynamic: args.dynamic.clone(),
        generated: args.auto_obstacles,
    };
    let (start, end) = if let Some(name) = &args.scene {
        let preset = scene::preset(name)
            .ok_or_else(|| anyhow!("unknown scene {name:?}; try `flocksim scenes`"))?;
        sources.map = Some(preset.map_path(&args.maps_dir));
        (preset.start(), preset.end())
    } else {
        let (Some(start), Some(end)) = (args.start, args.end) else {
            bail!("pass --scene, or both --start and --end");
        };
        sources.map = args.map.clone();
        (Pt2::new(start.0, start.1), Pt2::new(end.0, end.1))
    };
    Ok((start, end, sources))
}

fn record_for(cfg: &SimConfig, scene: &SceneArgs, extra: serde_json::Value, tag: Option<String>) -> Result<RunRecord> {
    let params = serde_json::json!({
        "config": serde_json::to_value(cfg)?,
        "scene": scene.scene,
        "map": scene.map,
        "dynamic": scene.dynamic,
        "auto_obstacles": scene.auto_obstacles,
        "run": extra,
    });
    Ok(RunRecord::seeded(cfg.seed, params).tagged(tag))
}

fn run(
    scene_args: &SceneArgs,
    config: &ConfigArgs,
    flock: usize,
    stats_out: Option<&Path>,
    frames_out: Option<&Path>,
    stop_after_arrived: Option<usize>,
    tag: Option<String>,
) -> Result<()> {
    let cfg = load_config(config)?;
    let (start, end, sources) = resolve_scene(scene_args)?;
    tracing::info!(flock, seed = cfg.seed, tag = ?tag, "run");

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let scene = Scene::assemble(start, end, &sources, &cfg, &mut rng);
    let mut sim = Simulation::new(&cfg, scene, flock, rng)?;

    let mut stats: Vec<TickStats> = Vec::new();
    let stop = |s: &TickStats| stop_after_arrived.is_some_and(|n| s.arrived >= n);
    let summary = match frames_out {
        Some(path) => {
            let mut writer = FrameWriter::create(path)?;
            let summary = sim.run(&mut writer, &mut stats, stop);
            let lines = writer.finish()?;
            tracing::info!(path = %path.display(), lines, "frames written");
            summary
        }
        None => sim.run(&mut Discard, &mut stats, stop),
    };

    let record = record_for(
        &cfg,
        scene_args,
        serde_json::json!({ "flock": flock, "stop_after_arrived": stop_after_arrived }),
        tag,
    )?;
    if let Some(path) = stats_out {
        output::write_stats(path, &stats)?;
        write_sidecar(path, &record)?;
    }
    if let Some(path) = frames_out {
        write_sidecar(path, &record)?;
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn plan(scene_args: &SceneArgs, config: &ConfigArgs) -> Result<()> {
    let cfg = load_config(config)?;
    let (start, end, sources) = resolve_scene(scene_args)?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let scene = Scene::assemble(start, end, &sources, &cfg, &mut rng);
    let mut prm = Prm::new(start, end, &cfg);
    let goals = prm.plan(&scene.obstacles, &mut rng)?;
    let obj = serde_json::json!({
        "nodes": prm.roadmap().len(),
        "edges": prm.roadmap().edge_count(),
        "regrowths": prm.regrowths(),
        "path": prm.path(),
        "goals": goals,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn scenes() -> Result<()> {
    for p in scene::PRESETS {
        println!(
            "{:<14} {:<18} start=({}, {}) end=({}, {})",
            p.name, p.map, p.start.0, p.start.1, p.end.0, p.end.1
        );
    }
    Ok(())
}

fn report(stats: Option<&Path>, tag: Option<String>) -> Result<()> {
    let obj = report_block(stats, tag)?;
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

/// Provenance of the run behind `stats` when its sidecar exists; a seedless block otherwise.
fn report_block(stats: Option<&Path>, tag: Option<String>) -> Result<serde_json::Value> {
    let Some(path) = stats else {
        return Ok(RunRecord::default().tagged(tag).to_json(&[]));
    };
    let mut record = match read_sidecar(path)? {
        Some(doc) => RunRecord::from_sidecar(&doc),
        None => {
            tracing::warn!(path = %path.display(), "no provenance sidecar; seed unknown");
            RunRecord::default()
        }
    };
    if tag.is_some() {
        record.tag = tag;
    }
    let summary = output::summarize_stats(path)?;
    tracing::info!(rows = summary.height(), cols = summary.width(), "stats_summary_shape");
    let mut obj = record.to_json(&[path.display().to_string()]);
    obj["summary"] = output::first_row_json(&summary)?;
    Ok(obj)
}
