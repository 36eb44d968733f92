use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::WeightedGraph;
use crate::error::SolveError;

/// Solver output: distances, predecessors and the order nodes were finalized in.
#[derive(Clone, Debug)]
pub struct Labels {
    dist: Vec<Option<f64>>,
    prev: Vec<Option<usize>>,
    order: Vec<usize>,
}

impl Labels {
    #[inline]
    pub fn distance(&self, v: usize) -> Option<f64> {
        self.dist.get(v).copied().flatten()
    }

    #[inline]
    pub fn predecessor(&self, v: usize) -> Option<usize> {
        self.prev.get(v).copied().flatten()
    }

    pub fn finalize_order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_final(&self, v: usize) -> bool {
        self.order.contains(&v)
    }
}

#[derive(Clone, Copy, Debug)]
struct Frontier {
    dist: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed so the max-heap pops the smallest distance; ties pop the lower index.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

fn check_node<G: WeightedGraph + ?Sized>(g: &G, node: usize) -> Result<(), SolveError> {
    let count = g.node_count();
    if node >= count {
        return Err(SolveError::UnknownNode { node, count });
    }
    Ok(())
}

/// Label-setting shortest paths from `source`.
///
/// Stops as soon as `target` (if given) is finalized. Unreached nodes keep a
/// `None` distance.
pub fn dijkstra<G: WeightedGraph + ?Sized>(
    g: &G,
    source: usize,
    target: Option<usize>,
) -> Result<Labels, SolveError> {
    check_node(g, source)?;
    if let Some(t) = target {
        check_node(g, t)?;
    }
    let n = g.node_count();
    let mut dist: Vec<Option<f64>> = vec![None; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut done = vec![false; n];
    let mut order = Vec::new();
    let mut heap = BinaryHeap::new();

    dist[source] = Some(0.0);
    heap.push(Frontier {
        dist: 0.0,
        node: source,
    });

    while let Some(Frontier { dist: d, node: u }) = heap.pop() {
        if done[u] {
            continue;
        }
        done[u] = true;
        order.push(u);
        if target == Some(u) {
            break;
        }
        for (v, w) in g.neighbors(u) {
            let candidate = d + w;
            if done[v] {
                if dist[v].is_some_and(|dv| candidate < dv) {
                    return Err(SolveError::InvariantViolation { node: v });
                }
                continue;
            }
            if dist[v].map_or(true, |dv| candidate < dv) {
                dist[v] = Some(candidate);
                prev[v] = Some(u);
                heap.push(Frontier {
                    dist: candidate,
                    node: v,
                });
            }
        }
    }

    Ok(Labels { dist, prev, order })
}

/// Node sequence from `source` to `target`.
///
/// Returns `[target]` when no chain of predecessors leads back to the source,
/// which the planner reads as "unreachable". `shortest_path(g, s, s)` is `[s]`.
pub fn shortest_path<G: WeightedGraph + ?Sized>(
    g: &G,
    source: usize,
    target: usize,
) -> Result<Vec<usize>, SolveError> {
    check_node(g, source)?;
    check_node(g, target)?;
    if source == target {
        return Ok(vec![source]);
    }
    let labels = dijkstra(g, source, Some(target))?;
    let mut path = vec![target];
    let mut cur = target;
    while let Some(p) = labels.predecessor(cur) {
        path.push(p);
        cur = p;
        if cur == source {
            path.reverse();
            return Ok(path);
        }
    }
    Ok(vec![target])
}
