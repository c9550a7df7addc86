//! The in-memory adjacency-array graph.
//!
//! Nodes and edges are packed into two flat arrays plus a per-node offset
//! array, so that relaxing all of a node's outgoing edges during search is
//! a contiguous scan rather than a pointer chase through per-node
//! allocations. See the design note on packed adjacency in the top-level
//! design docs for the rationale.

/// A single graph vertex: a geographic position and an elevation sample.
///
/// Elevation starts at zero and is written exactly once by
/// [`Graph::set_elevation_cm`] during startup; there is no API to change it
/// afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub lat: f64,
    pub lon: f64,
    pub elevation_cm: i32,
}

/// A directed edge. The source is implicit: whichever node's slice of
/// `Graph::edges` contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: u32,
    pub length_cm: u32,
    /// `max(0, elev(target) - elev(source))`, filled in by [`Graph::update_edge_climbs`].
    pub climb_cm: u32,
}

/// The frozen adjacency array. Constructed once with known `n`/`m`,
/// populated by the loader, and read-only for the remainder of the
/// process.
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    offsets: Vec<u32>,
}

impl Graph {
    /// Allocates a graph with `n` nodes and `m` edges, all zeroed.
    ///
    /// `offsets` starts fully zeroed at length `n + 1`; the loader is
    /// responsible for filling it in as edges are appended.
    #[must_use]
    pub fn with_capacity(n: usize, m: usize) -> Self {
        Self {
            nodes: vec![
                Node {
                    lat: 0.0,
                    lon: 0.0,
                    elevation_cm: 0,
                };
                n
            ],
            edges: vec![
                Edge {
                    target: 0,
                    length_cm: 0,
                    climb_cm: 0,
                };
                m
            ],
            offsets: vec![0; n + 1],
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn node(&self, id: u32) -> &Node {
        &self.nodes[id as usize]
    }

    pub(crate) fn node_mut(&mut self, id: u32) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    pub(crate) fn offsets_mut(&mut self) -> &mut [u32] {
        &mut self.offsets
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// The outgoing edges of `id`, in input order.
    #[must_use]
    pub fn edges_from(&self, id: u32) -> &[Edge] {
        let start = self.offsets[id as usize] as usize;
        let end = self.offsets[id as usize + 1] as usize;
        &self.edges[start..end]
    }

    /// Writes the elevation for a single node. Intended to be called once
    /// per node, in id order, during the backfill phase after loading.
    pub fn set_elevation_cm(&mut self, id: u32, elevation_cm: i32) {
        self.node_mut(id).elevation_cm = elevation_cm;
    }

    /// Recomputes every edge's climb from the now-populated node
    /// elevations: `climb(u -> v) = max(0, elev(v) - elev(u))`.
    ///
    /// Must be called after all node elevations are set; edge length is
    /// left untouched.
    pub fn update_edge_climbs(&mut self) {
        for source in 0..self.node_count() as u32 {
            let source_elev = self.node(source).elevation_cm;
            let start = self.offsets[source as usize] as usize;
            let end = self.offsets[source as usize + 1] as usize;
            for edge in &mut self.edges[start..end] {
                let target_elev = self.nodes[edge.target as usize].elevation_cm;
                #[expect(clippy::cast_sign_loss)]
                let climb = (target_elev - source_elev).max(0) as u32;
                edge.climb_cm = climb;
            }
        }
    }

    /// Iterates all nodes by id, yielding `(id, &Node)`.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (u32, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i as u32, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> Graph {
        // 0: (48.0, 9.0, 100cm), 1: (48.0001, 9.0, 500cm), edge 0->1 length 1500cm.
        let mut g = Graph::with_capacity(2, 1);
        g.node_mut(0).lat = 48.0;
        g.node_mut(0).lon = 9.0;
        g.node_mut(1).lat = 48.0001;
        g.node_mut(1).lon = 9.0;
        g.offsets_mut().copy_from_slice(&[0, 1, 1]);
        g.edges_mut()[0] = Edge {
            target: 1,
            length_cm: 1500,
            climb_cm: 0,
        };
        g
    }

    #[test]
    fn offsets_invariants_hold() {
        let g = two_node_graph();
        assert_eq!(g.offsets[0], 0);
        assert_eq!(g.offsets[g.node_count()], g.edge_count() as u32);
        for w in g.offsets.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn climb_is_max_of_zero_and_elevation_delta() {
        let mut g = two_node_graph();
        g.set_elevation_cm(0, 100);
        g.set_elevation_cm(1, 500);
        g.update_edge_climbs();
        assert_eq!(g.edges_from(0)[0].climb_cm, 400);
        assert_eq!(g.edges_from(0)[0].length_cm, 1500);
    }

    #[test]
    fn downhill_edge_has_zero_climb() {
        let mut g = two_node_graph();
        g.set_elevation_cm(0, 500);
        g.set_elevation_cm(1, 100);
        g.update_edge_climbs();
        assert_eq!(g.edges_from(0)[0].climb_cm, 0);
    }

    #[test]
    fn node_with_no_outgoing_edges_has_empty_slice() {
        let g = two_node_graph();
        assert!(g.edges_from(1).is_empty());
    }
}
