//! Linear-scan nearest-node lookup.
//!
//! At the scale this system operates at (tens of millions of nodes), a
//! spatial index would be the obvious next step, but a single linear scan
//! comparing squared distance in the lat/lon plane comfortably fits the
//! one-second interactive budget and keeps the implementation trivial.
//! See the design note on this tradeoff in the top-level design docs.

use crate::graph::Graph;

/// Returns the id of the node nearest to `(lat, lon)`, breaking ties by
/// lowest id. Panics if the graph has no nodes.
#[must_use]
pub fn nearest(graph: &Graph, lat: f64, lon: f64) -> u32 {
    assert!(graph.node_count() > 0, "cannot search an empty graph");

    let mut best_id = 0u32;
    let mut best_sq_dist = f64::INFINITY;

    for (id, node) in graph.iter_nodes() {
        let dlat = node.lat - lat;
        let dlon = node.lon - lon;
        let sq_dist = dlat * dlat + dlon * dlon;
        if sq_dist < best_sq_dist {
            best_sq_dist = sq_dist;
            best_id = id;
        }
    }

    best_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn three_points() -> Graph {
        let mut g = Graph::with_capacity(3, 0);
        g.offsets_mut().copy_from_slice(&[0, 0, 0, 0]);
        g.node_mut(0).lat = 48.0;
        g.node_mut(0).lon = 9.0;
        g.node_mut(1).lat = 49.0;
        g.node_mut(1).lon = 9.0;
        g.node_mut(2).lat = 48.0001;
        g.node_mut(2).lon = 9.0;
        g
    }

    #[test]
    fn finds_the_closest_node() {
        let g = three_points();
        assert_eq!(nearest(&g, 48.0, 9.0), 0);
        assert_eq!(nearest(&g, 48.00005, 9.0), 2);
    }

    #[test]
    fn ties_resolve_to_lowest_id() {
        let mut g = Graph::with_capacity(2, 0);
        g.offsets_mut().copy_from_slice(&[0, 0, 0]);
        g.node_mut(0).lat = 48.0;
        g.node_mut(0).lon = 9.0;
        g.node_mut(1).lat = 48.0;
        g.node_mut(1).lon = 9.0;
        assert_eq!(nearest(&g, 48.0, 9.0), 0);
    }
}
