use std::sync::Mutex;

use bike_router_core::graph::Graph;
use bike_router_core::route::RouteService;

/// The graph's bounding box and centroid, computed once at startup and
/// served as-is by `GET /bounds`.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let mut bounds = Self {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for (_, node) in graph.iter_nodes() {
            bounds.min_lat = bounds.min_lat.min(node.lat);
            bounds.max_lat = bounds.max_lat.max(node.lat);
            bounds.min_lon = bounds.min_lon.min(node.lon);
            bounds.max_lon = bounds.max_lon.max(node.lon);
        }
        bounds
    }
}

/// Shared, read-only graph plus one reusable Dijkstra work area.
///
/// Per the concurrency model, a single engine instance serves one query at
/// a time; the mutex below is how this service satisfies that constraint
/// ("the caller must serialize or maintain a per-worker instance") without
/// reallocating the O(node count) work arrays on every request.
pub struct AppState {
    pub graph: Graph,
    pub bounds: Bounds,
    pub route_service: Mutex<RouteService>,
}

impl AppState {
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        let bounds = Bounds::from_graph(&graph);
        let route_service = Mutex::new(RouteService::new(graph.node_count()));
        Self {
            graph,
            bounds,
            route_service,
        }
    }
}
