//! Weighted single-source shortest-path search.
//!
//! Entries pushed onto the frontier are immutable value types; an improved
//! tentative cost pushes a fresh entry rather than mutating one already in
//! the heap, and stale entries are discarded at pop time by checking the
//! `settled` flag. This sidesteps the classic decrease-key-on-a-binary-heap
//! correctness pitfall at the cost of a bounded constant factor in queue
//! size.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cost::edge_cost;
use crate::graph::Graph;

/// Sentinel returned by [`DijkstraEngine::one_to_one`] when the target is
/// unreachable from the source.
pub const UNREACHABLE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    cost: u64,
    node: u32,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so `BinaryHeap`, which is a max-heap, pops the minimum cost.
        other.cost.cmp(&self.cost).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Owns the reusable work arrays for repeated searches over one [`Graph`].
///
/// A single instance serves one query at a time; running two searches
/// concurrently on the same engine is a caller error (see the
/// concurrency model in the top-level design docs).
pub struct DijkstraEngine {
    dist: Vec<u64>,
    settled: Vec<bool>,
    pred: Vec<i32>,
    heap: BinaryHeap<Frontier>,
    /// Number of entries popped off the frontier during the most recent run.
    /// Purely diagnostic (used to confirm early termination in tests); not
    /// part of the routing result.
    last_run_pops: usize,
}

impl DijkstraEngine {
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            dist: vec![u64::MAX; node_count],
            settled: vec![false; node_count],
            pred: vec![-1; node_count],
            heap: BinaryHeap::new(),
            last_run_pops: 0,
        }
    }

    /// Number of frontier entries popped during the most recent run.
    #[must_use]
    pub fn last_run_pops(&self) -> usize {
        self.last_run_pops
    }

    fn reset(&mut self) {
        self.dist.fill(u64::MAX);
        self.settled.fill(false);
        self.pred.fill(-1);
        self.heap.clear();
        self.last_run_pops = 0;
    }

    /// Runs Dijkstra from `source` toward `target` at weight `w`, returning
    /// the total cost or [`UNREACHABLE`].
    ///
    /// `source` and `target` must be valid node ids; passing an
    /// out-of-range id is a programmer error and panics.
    pub fn one_to_one(&mut self, graph: &Graph, source: u32, target: u32, w: f64) -> i64 {
        self.one_to_one_impl(graph, source, target, w, false);
        self.result_for(target)
    }

    /// Like [`Self::one_to_one`], but also records predecessors so the
    /// path can be reconstructed with [`Self::reconstruct_path`].
    pub fn one_to_one_with_path(
        &mut self,
        graph: &Graph,
        source: u32,
        target: u32,
        w: f64,
    ) -> i64 {
        self.one_to_one_impl(graph, source, target, w, true);
        self.result_for(target)
    }

    fn result_for(&self, target: u32) -> i64 {
        let d = self.dist[target as usize];
        if d == u64::MAX {
            UNREACHABLE
        } else {
            #[expect(clippy::cast_possible_wrap)]
            let signed = d as i64;
            signed
        }
    }

    fn one_to_one_impl(
        &mut self,
        graph: &Graph,
        source: u32,
        target: u32,
        w: f64,
        track_pred: bool,
    ) {
        assert!(
            (source as usize) < graph.node_count() && (target as usize) < graph.node_count(),
            "source/target node id out of range"
        );

        self.reset();
        self.dist[source as usize] = 0;
        self.heap.push(Frontier {
            cost: 0,
            node: source,
        });

        while let Some(Frontier { cost, node }) = self.heap.pop() {
            self.last_run_pops += 1;
            if node == target {
                return;
            }
            if self.settled[node as usize] {
                continue;
            }
            self.settled[node as usize] = true;

            for edge in graph.edges_from(node) {
                let v = edge.target as usize;
                if self.settled[v] {
                    continue;
                }
                let new_dist = cost + edge_cost(edge, w);
                if new_dist < self.dist[v] {
                    self.dist[v] = new_dist;
                    if track_pred {
                        self.pred[v] = node as i32;
                    }
                    self.heap.push(Frontier {
                        cost: new_dist,
                        node: edge.target,
                    });
                }
            }
        }
    }

    /// Runs Dijkstra from `source` at weight `w` until the frontier is
    /// exhausted, returning costs to every node (`u64::MAX` for
    /// unreachable nodes).
    pub fn one_to_all(&mut self, graph: &Graph, source: u32, w: f64) -> &[u64] {
        assert!((source as usize) < graph.node_count(), "source node id out of range");

        self.reset();
        self.dist[source as usize] = 0;
        self.heap.push(Frontier {
            cost: 0,
            node: source,
        });

        while let Some(Frontier { cost, node }) = self.heap.pop() {
            self.last_run_pops += 1;
            if self.settled[node as usize] {
                continue;
            }
            self.settled[node as usize] = true;

            for edge in graph.edges_from(node) {
                let v = edge.target as usize;
                if self.settled[v] {
                    continue;
                }
                let new_dist = cost + edge_cost(edge, w);
                if new_dist < self.dist[v] {
                    self.dist[v] = new_dist;
                    self.heap.push(Frontier {
                        cost: new_dist,
                        node: edge.target,
                    });
                }
            }
        }

        &self.dist
    }

    /// Walks `pred` from `target` back to `source`, in order, returning
    /// `None` if the last [`Self::one_to_one_with_path`] run never reached
    /// `target`.
    #[must_use]
    pub fn reconstruct_path(&self, source: u32, target: u32) -> Option<Vec<u32>> {
        if self.dist[target as usize] == u64::MAX {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != source {
            let p = self.pred[current as usize];
            if p < 0 {
                // Predecessor tracking wasn't enabled for the run that produced this state.
                return None;
            }
            #[expect(clippy::cast_sign_loss)]
            let p = p as u32;
            path.push(p);
            current = p;
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use proptest::prelude::*;

    fn chain_graph(lengths: &[u32]) -> Graph {
        let n = lengths.len() + 1;
        let m = lengths.len();
        let mut g = Graph::with_capacity(n, m);
        for i in 0..n as u32 {
            g.offsets_mut()[i as usize] = i.min(m as u32);
        }
        g.offsets_mut()[n] = m as u32;
        for (i, &len) in lengths.iter().enumerate() {
            g.edges_mut()[i] = Edge {
                target: i as u32 + 1,
                length_cm: len,
                climb_cm: 0,
            };
        }
        g
    }

    #[test]
    fn identity_is_zero_for_any_weight() {
        let g = chain_graph(&[1000, 1000]);
        let mut engine = DijkstraEngine::new(g.node_count());
        assert_eq!(engine.one_to_one(&g, 1, 1, 1.0), 0);
        assert_eq!(engine.one_to_one(&g, 1, 1, 0.0), 0);
        assert_eq!(engine.one_to_one(&g, 1, 1, 0.37), 0);
    }

    #[test]
    fn three_node_chain_matches_spec_scenario() {
        let g = chain_graph(&[1000, 1000]);
        let mut engine = DijkstraEngine::new(g.node_count());
        assert_eq!(engine.one_to_one(&g, 0, 2, 1.0), 2000);
        assert_eq!(engine.one_to_one(&g, 0, 1, 1.0), 1000);
    }

    #[test]
    fn one_to_one_terminates_early_without_exploring_past_the_target() {
        let g = chain_graph(&[1000, 1000]);
        let mut engine = DijkstraEngine::new(g.node_count());
        let cost = engine.one_to_one(&g, 0, 1, 1.0);
        assert_eq!(cost, 1000);
        assert!(
            engine.last_run_pops() <= 2,
            "expected at most 2 pops, got {}",
            engine.last_run_pops()
        );
    }

    #[test]
    fn unreachable_nodes_return_sentinel() {
        let mut g = Graph::with_capacity(2, 0);
        g.offsets_mut().copy_from_slice(&[0, 0, 0]);
        let mut engine = DijkstraEngine::new(g.node_count());
        assert_eq!(engine.one_to_one(&g, 0, 1, 1.0), UNREACHABLE);
    }

    #[test]
    fn one_to_all_agrees_with_one_to_one() {
        let g = chain_graph(&[1000, 1500, 400]);
        let mut engine = DijkstraEngine::new(g.node_count());
        let all = engine.one_to_all(&g, 0, 1.0).to_vec();

        let mut engine2 = DijkstraEngine::new(g.node_count());
        for t in 0..g.node_count() as u32 {
            let one = engine2.one_to_one(&g, 0, t, 1.0);
            let expected = if all[t as usize] == u64::MAX {
                UNREACHABLE
            } else {
                all[t as usize] as i64
            };
            assert_eq!(one, expected);
        }
    }

    #[test]
    fn path_reconstruction_matches_visited_chain() {
        let g = chain_graph(&[1000, 1500, 400]);
        let mut engine = DijkstraEngine::new(g.node_count());
        engine.one_to_one_with_path(&g, 0, 3, 1.0);
        let path = engine.reconstruct_path(0, 3).expect("path should exist");
        assert_eq!(path, vec![0, 1, 2, 3]);
    }

    #[test]
    fn diamond_graph_is_deterministic_across_runs() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3, both costing 2000.
        let mut g = Graph::with_capacity(4, 4);
        g.offsets_mut().copy_from_slice(&[0, 2, 3, 4, 4]);
        g.edges_mut()[0] = Edge {
            target: 1,
            length_cm: 1000,
            climb_cm: 0,
        };
        g.edges_mut()[1] = Edge {
            target: 2,
            length_cm: 1000,
            climb_cm: 0,
        };
        g.edges_mut()[2] = Edge {
            target: 3,
            length_cm: 1000,
            climb_cm: 0,
        };
        g.edges_mut()[3] = Edge {
            target: 3,
            length_cm: 1000,
            climb_cm: 0,
        };

        let mut engine = DijkstraEngine::new(g.node_count());
        let first = engine.one_to_one(&g, 0, 3, 1.0);
        let second = engine.one_to_one(&g, 0, 3, 1.0);
        assert_eq!(first, 2000);
        assert_eq!(first, second);
    }

    /// Builds a chain `0 - 1 - ... - n` where every hop's forward and
    /// backward edge carry identical length and climb, for the symmetry
    /// law in spec.md's routing-laws list.
    fn mirrored_chain_graph(hops: &[(u32, u32)]) -> Graph {
        let n = hops.len() + 1;
        let m = 2 * hops.len();
        let mut g = Graph::with_capacity(n, m);

        let mut offsets = vec![0u32; n + 1];
        for i in 0..n {
            let out_degree = match i {
                0 if n == 1 => 0,
                0 => 1,
                i if i == n - 1 => 1,
                _ => 2,
            };
            offsets[i + 1] = offsets[i] + out_degree as u32;
        }
        g.offsets_mut().copy_from_slice(&offsets);

        let mut next_slot = offsets.clone();
        for (i, &(length_cm, climb_cm)) in hops.iter().enumerate() {
            let (u, v) = (i as u32, i as u32 + 1);
            let slot = next_slot[u as usize] as usize;
            g.edges_mut()[slot] = Edge {
                target: v,
                length_cm,
                climb_cm,
            };
            next_slot[u as usize] += 1;

            let slot = next_slot[v as usize] as usize;
            g.edges_mut()[slot] = Edge {
                target: u,
                length_cm,
                climb_cm,
            };
            next_slot[v as usize] += 1;
        }
        g
    }

    #[test]
    fn symmetric_edges_give_symmetric_distances_at_pure_distance_weight() {
        // Every hop's forward and backward edge share length and climb, so
        // per spec.md's symmetry law, dist(u, v) == dist(v, u) at w = 1.0.
        let g = mirrored_chain_graph(&[(1000, 300), (1500, 0), (400, 900)]);
        let mut engine = DijkstraEngine::new(g.node_count());
        let forward = engine.one_to_one(&g, 0, 3, 1.0);
        let backward = engine.one_to_one(&g, 3, 0, 1.0);
        assert_eq!(forward, backward);
        assert_eq!(forward, 2900);
    }

    proptest! {
        #[test]
        fn mirrored_edges_are_symmetric_for_any_hop_count(
            hops in proptest::collection::vec((0u32..5000, 0u32..5000), 1..8),
        ) {
            let g = mirrored_chain_graph(&hops);
            let last = hops.len() as u32;
            let mut engine = DijkstraEngine::new(g.node_count());
            let forward = engine.one_to_one(&g, 0, last, 1.0);
            let backward = engine.one_to_one(&g, last, 0, 1.0);
            prop_assert_eq!(forward, backward);
        }
    }
}
