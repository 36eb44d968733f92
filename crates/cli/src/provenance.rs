//! Provenance sidecars: a small JSON file next to every artifact a run writes.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::output::ensure_parent;

const SIDECAR_SUFFIX: &str = ".provenance.json";

/// What a run needs to be reproduced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunRecord {
    /// `None` when the block does not describe a single run.
    pub seed: Option<u64>,
    pub tag: Option<String>,
    pub params: Value,
}

impl RunRecord {
    pub fn seeded(seed: u64, params: Value) -> Self {
        Self {
            seed: Some(seed),
            tag: None,
            params,
        }
    }

    pub fn tagged(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Rebuild the record from a sidecar written by `write_sidecar`.
    pub fn from_sidecar(doc: &Value) -> Self {
        Self {
            seed: doc["seed"].as_u64(),
            tag: doc["tag"].as_str().map(str::to_owned),
            params: doc.get("params").cloned().unwrap_or(Value::Null),
        }
    }

    /// JSON block shared by sidecars and `report`; `seed` is left out when unknown.
    pub fn to_json(&self, outputs: &[String]) -> Value {
        let mut doc = Map::new();
        doc.insert("code_rev".into(), json!(current_git_rev()));
        doc.insert("version".into(), json!(flocksim::VERSION));
        doc.insert("tag".into(), json!(self.tag));
        if let Some(seed) = self.seed {
            doc.insert("seed".into(), json!(seed));
        }
        doc.insert("params".into(), self.params.clone());
        doc.insert("outputs".into(), json!(outputs));
        Value::Object(doc)
    }
}

/// Sidecar location for `artifact`: same directory, extension replaced.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = match artifact.file_stem() {
        Some(s) => s.to_string_lossy(),
        None => "artifact".into(),
    };
    artifact.with_file_name(format!("{stem}{SIDECAR_SUFFIX}"))
}

/// Record `artifact` with the calling source location and return the sidecar path.
#[track_caller]
pub fn write_sidecar(artifact: impl AsRef<Path>, record: &RunRecord) -> Result<PathBuf> {
    let caller = Location::caller();
    let artifact = artifact.as_ref();
    let target = sidecar_path(artifact);
    ensure_parent(&target)?;

    let mut doc = record.to_json(&[artifact.display().to_string()]);
    doc["callsite"] = json!({ "file": caller.file(), "line": caller.line() });
    let bytes = serde_json::to_vec_pretty(&doc)?;
    fs::write(&target, bytes).with_context(|| format!("writing {}", target.display()))?;
    Ok(target)
}

/// Sidecar of `artifact`, if one was written.
pub fn read_sidecar(artifact: &Path) -> Result<Option<Value>> {
    let path = sidecar_path(artifact);
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let doc = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(doc))
}

fn baked_rev() -> Option<String> {
    option_env!("GIT_COMMIT").map(str::to_owned)
}

fn runtime_rev() -> Option<String> {
    std::env::var("GIT_COMMIT").ok()
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok().map(|s| s.trim().to_owned())
}

/// Commit of the running code; `"unknown"` outside a checkout.
pub fn current_git_rev() -> String {
    let sources: [fn() -> Option<String>; 3] = [baked_rev, runtime_rev, git_head];
    sources
        .iter()
        .find_map(|source| source().filter(|rev| !rev.is_empty()))
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/runs/stats.parquet")),
            Path::new("/tmp/runs/stats.provenance.json")
        );
        assert!(sidecar_path(Path::new("/")).ends_with("artifact.provenance.json"));
    }

    #[test]
    fn sidecar_round_trips_the_run() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("stats.csv");
        let record = RunRecord::seeded(42, json!({"flock": 12})).tagged(Some("smoke".into()));
        let path = write_sidecar(&artifact, &record).unwrap();
        assert!(path.exists());

        let doc = read_sidecar(&artifact).unwrap().unwrap();
        assert_eq!(doc["seed"], 42);
        assert_eq!(doc["outputs"][0], artifact.display().to_string());
        assert!(doc["callsite"]["line"].as_u64().is_some());
        assert_eq!(RunRecord::from_sidecar(&doc), record);
    }

    #[test]
    fn unknown_seed_is_omitted() {
        let doc = RunRecord::default().to_json(&[]);
        assert!(doc.get("seed").is_none());
        assert!(doc["code_rev"].as_str().is_some_and(|r| !r.is_empty()));
    }

    #[test]
    fn missing_sidecar_reads_as_none() {
        let dir = tempdir().unwrap();
        assert!(read_sidecar(&dir.path().join("stats.csv")).unwrap().is_none());
    }
}
