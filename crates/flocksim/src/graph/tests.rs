use super::*;
use crate::error::SolveError;
use nalgebra::vector;
use proptest::prelude::*;

/// Directed adjacency list; lets tests feed weights a roadmap never holds.
struct AdjList(Vec<Vec<(usize, f64)>>);

impl WeightedGraph for AdjList {
    fn node_count(&self) -> usize {
        self.0.len()
    }

    fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0[v].iter().copied()
    }
}

fn line_roadmap(n: usize) -> Roadmap {
    let mut g = Roadmap::with_nodes((0..n).map(|i| vector![i as f64, 0.0]).collect());
    for i in 1..n {
        g.add_edge(i - 1, i, 1.0);
    }
    g
}

#[test]
fn roadmap_edges_are_symmetric() {
    let mut g = Roadmap::with_nodes(vec![vector![0.0, 0.0]; 3]);
    g.add_edge(0, 2, 4.5);
    assert_eq!(g.weight(0, 2), Some(4.5));
    assert_eq!(g.weight(2, 0), Some(4.5));
    assert_eq!(g.weight(0, 1), None);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 2, 4.5)]);
}

#[test]
fn pop_node_drops_incident_edges() {
    let mut g = line_roadmap(4);
    g.add_edge(0, 3, 2.0);
    assert_eq!(g.pop_node(), Some(vector![3.0, 0.0]));
    assert_eq!(g.len(), 3);
    assert_eq!(g.degree(0), 1);
    assert_eq!(g.degree(2), 1);
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn path_along_a_line() {
    let g = line_roadmap(5);
    assert_eq!(shortest_path(&g, 0, 4).unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(shortest_path(&g, 3, 1).unwrap(), vec![3, 2, 1]);
}

#[test]
fn path_to_self_is_singleton() {
    let g = line_roadmap(3);
    assert_eq!(shortest_path(&g, 1, 1).unwrap(), vec![1]);
}

#[test]
fn unreachable_target_yields_singleton() {
    let mut g = line_roadmap(3);
    g.push_node(vector![10.0, 10.0]);
    assert_eq!(shortest_path(&g, 0, 3).unwrap(), vec![3]);
    let labels = dijkstra(&g, 0, None).unwrap();
    assert_eq!(labels.distance(3), None);
}

#[test]
fn prefers_lighter_detour() {
    // 0 -10- 2 direct, 0 -1- 1 -1- 2 around
    let mut g = Roadmap::with_nodes(vec![vector![0.0, 0.0]; 3]);
    g.add_edge(0, 2, 10.0);
    g.add_edge(0, 1, 1.0);
    g.add_edge(1, 2, 1.0);
    assert_eq!(shortest_path(&g, 0, 2).unwrap(), vec![0, 1, 2]);
    let labels = dijkstra(&g, 0, None).unwrap();
    assert_eq!(labels.distance(2), Some(2.0));
    assert_eq!(labels.predecessor(2), Some(1));
}

#[test]
fn infinite_weight_still_connects() {
    let g = AdjList(vec![vec![(1, f64::INFINITY)], vec![]]);
    assert_eq!(shortest_path(&g, 0, 1).unwrap(), vec![0, 1]);
    let labels = dijkstra(&g, 0, None).unwrap();
    assert_eq!(labels.distance(1), Some(f64::INFINITY));
}

#[test]
fn stops_once_target_is_final() {
    let g = line_roadmap(6);
    let labels = dijkstra(&g, 0, Some(2)).unwrap();
    assert_eq!(labels.finalize_order(), &[0, 1, 2]);
    assert!(!labels.is_final(3));
}

#[test]
fn negative_weight_is_an_invariant_violation() {
    let g = AdjList(vec![
        vec![(1, 1.0), (2, 5.0)],
        vec![],
        vec![(1, -10.0)],
    ]);
    assert_eq!(
        dijkstra(&g, 0, None).unwrap_err(),
        SolveError::InvariantViolation { node: 1 }
    );
}

#[test]
fn unknown_nodes_are_rejected() {
    let g = line_roadmap(2);
    assert_eq!(
        shortest_path(&g, 0, 5).unwrap_err(),
        SolveError::UnknownNode { node: 5, count: 2 }
    );
    assert!(dijkstra(&g, 9, None).is_err());
}

fn random_roadmap() -> impl Strategy<Value = Roadmap> {
    (2usize..24).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n, 0.0..100.0f64), 0..(n * 3)).prop_map(
            move |edges| {
                let mut g = Roadmap::with_nodes(vec![vector![0.0, 0.0]; n]);
                for (a, b, w) in edges {
                    if a != b {
                        g.add_edge(a, b, w);
                    }
                }
                g
            },
        )
    })
}

proptest! {
    #[test]
    fn finalize_order_is_non_decreasing(g in random_roadmap()) {
        let labels = dijkstra(&g, 0, None).unwrap();
        let ds: Vec<f64> = labels
            .finalize_order()
            .iter()
            .map(|v| labels.distance(*v).unwrap())
            .collect();
        prop_assert!(ds.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn path_weight_matches_label(g in random_roadmap()) {
        let t = g.len() - 1;
        let path = shortest_path(&g, 0, t).unwrap();
        let labels = dijkstra(&g, 0, None).unwrap();
        match labels.distance(t) {
            Some(d) => {
                prop_assert_eq!(path[0], 0);
                prop_assert_eq!(*path.last().unwrap(), t);
                let total: f64 = path
                    .windows(2)
                    .map(|e| g.weight(e[0], e[1]).unwrap())
                    .sum();
                prop_assert!((total - d).abs() < 1e-9);
            }
            None => prop_assert_eq!(path, vec![t]),
        }
    }

    #[test]
    fn self_path_is_singleton(g in random_roadmap(), pick in 0usize..24) {
        let s = pick % g.len();
        prop_assert_eq!(shortest_path(&g, s, s).unwrap(), vec![s]);
    }
}
