//! Roadmap storage and the label-setting shortest path.
//!
//! Purpose
//! - `Roadmap` keeps node positions plus a symmetric weighted adjacency. Each
//!   node's neighbors sit in a `BTreeMap` so iteration order, and with it every
//!   tie-break in the solver, is deterministic.
//! - `dijkstra` works on anything implementing `WeightedGraph`; the planner
//!   only ever hands it a `Roadmap`, tests also use plain adjacency lists.
//!
//! Model
//! - Tentative distances are `Option<f64>`: "not reached yet" is distinct from
//!   "reached at infinite cost", so an infinite edge weight still connects.
//! - A strictly shorter distance to an already-finalized node means the graph
//!   has a negative weight. That aborts the solve with
//!   `SolveError::InvariantViolation`.

mod dijkstra;
mod roadmap;

pub use dijkstra::{dijkstra, shortest_path, Labels};
pub use roadmap::Roadmap;

/// Read access the solver needs from a graph.
pub trait WeightedGraph {
    fn node_count(&self) -> usize;
    /// Outgoing `(neighbor, weight)` pairs of `v`.
    fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, f64)> + '_;
}

#[cfg(test)]
mod tests;
