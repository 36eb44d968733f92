//! Error types shared across the crate.
//!
//! Geometric degeneracies never surface here; they are absorbed where they
//! occur (epsilon nudges, zero-length segment guards).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
}

/// Failures of the label-setting solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// A strictly shorter path reached a node that was already finalized.
    /// Only possible with a negative edge weight; the roadmap never builds one.
    #[error("found a shorter path to already-final node {node} (negative edge weight in graph)")]
    InvariantViolation { node: usize },

    #[error("node {node} is not in the graph ({count} nodes)")]
    UnknownNode { node: usize, count: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("end is unreachable from start after {attempts} regrowth rounds ({nodes} roadmap nodes)")]
    Unreachable { attempts: usize, nodes: usize },

    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("reading map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl MapError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
