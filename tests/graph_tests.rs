//! Graph algorithms driven by the Fibonacci heap
//!
//! Prim's MST and Dijkstra's shortest paths are the workloads decrease-key
//! exists for. Both are checked against naive O(n^2) versions on seeded random
//! graphs.

use fib_heap::{FibonacciHandle, FibonacciHeap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Adjacency list: `graph[u]` holds `(v, weight)` pairs
type Graph = Vec<Vec<(usize, u64)>>;

fn random_graph(rng: &mut StdRng, n: usize, edge_prob: f64, undirected: bool) -> Graph {
    let mut graph = vec![Vec::new(); n];
    for u in 0..n {
        for v in 0..n {
            if u == v || (undirected && v < u) {
                continue;
            }
            if rng.gen_bool(edge_prob) {
                let w = rng.gen_range(1..1_000);
                graph[u].push((v, w));
                if undirected {
                    graph[v].push((u, w));
                }
            }
        }
    }
    graph
}

/// Dense weight matrix with `None` for a missing edge; keeps the lightest
/// of parallel edges
fn weight_matrix(graph: &Graph) -> Vec<Vec<Option<u64>>> {
    let n = graph.len();
    let mut matrix = vec![vec![None; n]; n];
    for (u, edges) in graph.iter().enumerate() {
        for &(v, w) in edges {
            let slot: &mut Option<u64> = &mut matrix[u][v];
            *slot = Some(slot.map_or(w, |old| old.min(w)));
        }
    }
    matrix
}

fn dijkstra(graph: &Graph, source: usize) -> Vec<Option<u64>> {
    let n = graph.len();
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut handles: Vec<Option<FibonacciHandle>> = vec![None; n];
    let mut done = vec![false; n];
    let mut heap = FibonacciHeap::with_capacity(n);

    dist[source] = Some(0);
    handles[source] = Some(heap.insert(0u64, source));

    while let Some((d, u)) = heap.extract_min() {
        done[u] = true;
        for &(v, w) in &graph[u] {
            if done[v] {
                continue;
            }
            let candidate = d + w;
            match (dist[v], handles[v]) {
                (Some(old), Some(h)) if candidate < old => {
                    heap.decrease_key(&h, candidate).unwrap();
                    dist[v] = Some(candidate);
                }
                (None, _) => {
                    dist[v] = Some(candidate);
                    handles[v] = Some(heap.insert(candidate, v));
                }
                _ => {}
            }
        }
    }
    dist
}

fn naive_dijkstra(graph: &Graph, source: usize) -> Vec<Option<u64>> {
    let n = graph.len();
    let matrix = weight_matrix(graph);
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut done = vec![false; n];
    dist[source] = Some(0);

    loop {
        let next = (0..n)
            .filter(|&v| !done[v])
            .filter_map(|v| dist[v].map(|d| (d, v)))
            .min();
        let Some((d, u)) = next else {
            break;
        };
        done[u] = true;
        for v in 0..n {
            if let Some(w) = matrix[u][v] {
                if dist[v].map_or(true, |old| d + w < old) {
                    dist[v] = Some(d + w);
                }
            }
        }
    }
    dist
}

/// Total MST weight of the component containing vertex 0, plus its size
fn prim(graph: &Graph) -> (u64, usize) {
    let n = graph.len();
    let mut handles: Vec<Option<FibonacciHandle>> = vec![None; n];
    let mut in_tree = vec![false; n];
    let mut heap = FibonacciHeap::new();
    handles[0] = Some(heap.insert(0u64, 0usize));

    let mut total = 0;
    let mut size = 0;
    while let Some((w, u)) = heap.extract_min() {
        in_tree[u] = true;
        total += w;
        size += 1;
        for &(v, weight) in &graph[u] {
            if in_tree[v] {
                continue;
            }
            match handles[v] {
                Some(h) if heap.contains(&h) => {
                    // Rejected when the new edge is no lighter; that is fine
                    let _ = heap.decrease_key(&h, weight);
                }
                Some(_) => {}
                None => handles[v] = Some(heap.insert(weight, v)),
            }
        }
    }
    (total, size)
}

fn naive_prim(graph: &Graph) -> (u64, usize) {
    let n = graph.len();
    let matrix = weight_matrix(graph);
    let mut best: Vec<Option<u64>> = vec![None; n];
    let mut in_tree = vec![false; n];
    best[0] = Some(0);

    let mut total = 0;
    let mut size = 0;
    loop {
        let next = (0..n)
            .filter(|&v| !in_tree[v])
            .filter_map(|v| best[v].map(|w| (w, v)))
            .min();
        let Some((w, u)) = next else {
            break;
        };
        in_tree[u] = true;
        total += w;
        size += 1;
        for v in 0..n {
            if let Some(weight) = matrix[u][v] {
                if !in_tree[v] && best[v].map_or(true, |old| weight < old) {
                    best[v] = Some(weight);
                }
            }
        }
    }
    (total, size)
}

#[test]
fn test_dijkstra_small_graph() {
    // 0 -> 1 (4), 0 -> 2 (1), 2 -> 1 (2), 1 -> 3 (1), 2 -> 3 (5)
    let graph: Graph = vec![
        vec![(1, 4), (2, 1)],
        vec![(3, 1)],
        vec![(1, 2), (3, 5)],
        vec![],
        vec![],
    ];
    let dist = dijkstra(&graph, 0);
    assert_eq!(dist, vec![Some(0), Some(3), Some(1), Some(4), None]);
}

#[test]
fn test_dijkstra_matches_naive() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = rng.gen_range(2..80);
        let graph = random_graph(&mut rng, n, 0.15, false);
        let source = rng.gen_range(0..n);
        assert_eq!(
            dijkstra(&graph, source),
            naive_dijkstra(&graph, source),
            "seed {seed}"
        );
    }
}

#[test]
fn test_dijkstra_dense_graph() {
    let mut rng = StdRng::seed_from_u64(0xD1);
    let graph = random_graph(&mut rng, 200, 0.9, false);
    assert_eq!(dijkstra(&graph, 0), naive_dijkstra(&graph, 0));
}

#[test]
fn test_prim_small_graph() {
    // Square with a diagonal: MST takes 1 + 2 + 3
    let mut graph: Graph = vec![Vec::new(); 4];
    for &(u, v, w) in &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 0, 4), (0, 2, 5)] {
        graph[u].push((v, w));
        graph[v].push((u, w));
    }
    assert_eq!(prim(&graph), (6, 4));
}

#[test]
fn test_prim_matches_naive() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(1_000 + seed);
        let n = rng.gen_range(1..80);
        let graph = random_graph(&mut rng, n, 0.2, true);
        assert_eq!(prim(&graph), naive_prim(&graph), "seed {seed}");
    }
}

#[test]
fn test_prim_complete_graph() {
    let mut rng = StdRng::seed_from_u64(0x9217);
    let graph = random_graph(&mut rng, 150, 1.0, true);
    let (total, size) = prim(&graph);
    assert_eq!(size, 150);
    assert_eq!((total, size), naive_prim(&graph));
}
