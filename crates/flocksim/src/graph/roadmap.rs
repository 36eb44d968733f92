use std::collections::BTreeMap;

use serde::Serialize;

use super::WeightedGraph;
use crate::geom::Pt2;

/// Positions plus symmetric weighted adjacency.
///
/// Node 0 is the start and the last node is the end once the planner has
/// built the map; the type itself does not enforce that.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Roadmap {
    nodes: Vec<Pt2>,
    adjacency: Vec<BTreeMap<usize, f64>>,
}

impl Roadmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<Pt2>) -> Self {
        let adjacency = vec![BTreeMap::new(); nodes.len()];
        Self { nodes, adjacency }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn position(&self, v: usize) -> Pt2 {
        self.nodes[v]
    }

    pub fn positions(&self) -> &[Pt2] {
        &self.nodes
    }

    pub fn push_node(&mut self, p: Pt2) -> usize {
        self.nodes.push(p);
        self.adjacency.push(BTreeMap::new());
        self.nodes.len() - 1
    }

    /// Remove the last node together with every edge touching it.
    pub fn pop_node(&mut self) -> Option<Pt2> {
        let p = self.nodes.pop()?;
        let v = self.nodes.len();
        if let Some(adj) = self.adjacency.pop() {
            for u in adj.keys() {
                self.adjacency[*u].remove(&v);
            }
        }
        Some(p)
    }

    /// Insert (or overwrite) the undirected edge `a`–`b`.
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) {
        debug_assert!(weight >= 0.0, "roadmap weights must be non-negative");
        self.adjacency[a].insert(b, weight);
        self.adjacency[b].insert(a, weight);
    }

    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        self.adjacency.get(a)?.get(&b).copied()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// Each undirected edge once, as `(a, b, weight)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, adj)| {
            adj.iter()
                .filter(move |(b, _)| a < **b)
                .map(move |(b, w)| (a, *b, *w))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

impl WeightedGraph for Roadmap {
    #[inline]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[v].iter().map(|(u, w)| (*u, *w))
    }
}
