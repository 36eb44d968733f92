//! Run artifacts: per-tick stats tables and JSON-lines frame dumps.

use anyhow::{bail, Context, Result};
use flocksim::obstacle::ObstacleSet;
use flocksim::prelude::*;
use flocksim::sim::Frame;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Table format picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(TableFormat::Csv),
            Some("parquet") => Ok(TableFormat::Parquet),
            other => bail!("unsupported stats extension {:?} (use .csv or .parquet)", other),
        }
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn stats_frame(stats: &[TickStats]) -> Result<DataFrame> {
    let df = df!(
        "step" => stats.iter().map(|s| s.step as u64).collect::<Vec<_>>(),
        "elapsed_secs" => stats.iter().map(|s| s.elapsed_secs).collect::<Vec<_>>(),
        "mean_distance" => stats.iter().map(|s| s.mean_distance).collect::<Vec<_>>(),
        "mean_nearest" => stats.iter().map(|s| s.mean_nearest).collect::<Vec<_>>(),
        "arrived" => stats.iter().map(|s| s.arrived as u64).collect::<Vec<_>>(),
        "stuck_total" => stats.iter().map(|s| s.stuck_total as u64).collect::<Vec<_>>(),
        "stuck_now" => stats.iter().map(|s| s.stuck_now as u64).collect::<Vec<_>>(),
    )?;
    Ok(df)
}

pub fn write_stats(path: &Path, stats: &[TickStats]) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    ensure_parent(path)?;
    let mut df = stats_frame(stats)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
    }
    tracing::info!(path = %path.display(), rows = df.height(), "stats written");
    Ok(())
}

/// One-row summary of a stats table: ticks, final arrivals and stuck count, mean spacing.
pub fn summarize_stats(path: &Path) -> Result<DataFrame> {
    let lf = match TableFormat::from_path(path)? {
        TableFormat::Csv => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?,
        TableFormat::Parquet => LazyFrame::scan_parquet(path, ScanArgsParquet::default())?,
    };
    let df = lf
        .select([
            col("step").max().alias("ticks"),
            col("arrived").max().alias("arrived"),
            col("stuck_total").max().alias("stuck_total"),
            col("mean_distance").mean().alias("mean_distance"),
            col("mean_nearest").mean().alias("mean_nearest"),
            col("elapsed_secs").max().alias("elapsed_secs"),
        ])
        .collect()?;
    Ok(df)
}

/// First row of `df` as a JSON object of floats.
pub fn first_row_json(df: &DataFrame) -> Result<serde_json::Value> {
    let mut row = serde_json::Map::new();
    for series in df.get_columns() {
        let values = series.cast(&DataType::Float64)?;
        let value = values.f64()?.get(0);
        row.insert(series.name().to_string(), serde_json::json!(value));
    }
    Ok(serde_json::Value::Object(row))
}

/// First line of a frame dump: everything that does not change during a run.
#[derive(Serialize)]
struct Header<'a> {
    roadmap: &'a Roadmap,
    path: &'a [usize],
    goals: &'a [Goal],
    obstacles: &'a ObstacleSet,
}

#[derive(Serialize)]
struct AgentRow {
    x: f64,
    y: f64,
    heading: [f64; 2],
    goal: usize,
    state: AgentState,
}

/// Every following line: agents and the moving obstacles.
#[derive(Serialize)]
struct FrameRow<'a> {
    step: usize,
    agents: Vec<AgentRow>,
    movers: Vec<&'a [Pt2]>,
}

/// `RenderSink` that writes one JSON object per line.
///
/// Write errors are kept and reported by `finish`, since the sink itself
/// cannot fail.
pub struct FrameWriter {
    path: PathBuf,
    out: BufWriter<File>,
    lines: usize,
    error: Option<io::Error>,
}

impl FrameWriter {
    pub fn create(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            lines: 0,
            error: None,
        })
    }

    fn write_line<T: Serialize>(&mut self, value: &T) {
        if self.error.is_some() {
            return;
        }
        let res = serde_json::to_writer(&mut self.out, value)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        match res {
            Ok(()) => self.lines += 1,
            Err(err) => self.error = Some(err),
        }
    }

    /// Flush and return the number of lines written.
    pub fn finish(mut self) -> Result<usize> {
        if let Some(err) = self.error.take() {
            return Err(err).with_context(|| format!("writing frames to {}", self.path.display()));
        }
        self.out
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;
        Ok(self.lines)
    }
}

impl RenderSink for FrameWriter {
    fn frame(&mut self, frame: &Frame<'_>) {
        if self.lines == 0 {
            self.write_line(&Header {
                roadmap: frame.roadmap,
                path: frame.path,
                goals: frame.goals,
                obstacles: frame.obstacles,
            });
        }
        let row = FrameRow {
            step: frame.step,
            agents: frame
                .agents
                .iter()
                .map(|a| AgentRow {
                    x: a.position().x,
                    y: a.position().y,
                    heading: [a.heading().x, a.heading().y],
                    goal: a.goal_index(),
                    state: a.state(),
                })
                .collect(),
            movers: frame
                .obstacles
                .iter()
                .filter(|o| o.is_dynamic())
                .map(|o| o.polygon().vertices())
                .collect(),
        };
        self.write_line(&row);
    }
}
