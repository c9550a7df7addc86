//! Translates a user-facing slider value into a routing weight and
//! materializes a reconstructed path as coordinates plus aggregate
//! distance and climb.

use serde::Serialize;

use crate::dijkstra::DijkstraEngine;
use crate::error::RouteError;
use crate::graph::Graph;

/// The tunable exponent in the slider remap `w = sigma^SLIDER_EXPONENT`.
/// Chosen so the middle of the slider's range visibly shifts the chosen
/// path rather than collapsing onto the pure-distance solution; see the
/// slider-rescaling design note.
const SLIDER_EXPONENT: f64 = 0.7;

/// A reconstructed route: aggregate metrics plus the coordinate sequence
/// in `(lon, lat)` order (GeoJSON convention).
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    pub distance_cm: u64,
    pub elevation_gain_cm: u64,
    pub node_count: usize,
    pub coordinates: Vec<(f64, f64)>,
}

/// Wraps a [`DijkstraEngine`] with the slider-rescaling policy described
/// in the Route Service design.
pub struct RouteService {
    engine: DijkstraEngine,
}

impl RouteService {
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            engine: DijkstraEngine::new(node_count),
        }
    }

    /// Computes the route between `source` and `target` for slider value
    /// `slider` (expected in `[0, 1]`), returning aggregate metrics and a
    /// coordinate sequence, or [`RouteError::Unreachable`] if no path
    /// exists at all (connectivity is independent of the weight, so this
    /// is checked once at the distance extreme).
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unreachable`] if no path exists between
    /// `source` and `target`.
    pub fn route(
        &mut self,
        graph: &Graph,
        source: u32,
        target: u32,
        slider: f64,
    ) -> Result<RouteResult, RouteError> {
        let slider = slider.clamp(0.0, 1.0);

        let Some((_, distance_at_w1, climb_at_w1)) =
            self.run_and_measure(graph, source, target, 1.0)
        else {
            return Err(RouteError::Unreachable {
                from: source,
                to: target,
            });
        };

        let Some((_, distance_at_w0, climb_at_w0)) =
            self.run_and_measure(graph, source, target, 0.0)
        else {
            return Err(RouteError::Unreachable {
                from: source,
                to: target,
            });
        };

        let d_max = distance_at_w1.max(distance_at_w0);
        let g_max = climb_at_w1.max(climb_at_w0);

        let w = if d_max == 0 || g_max == 0 {
            slider
        } else {
            slider.powf(SLIDER_EXPONENT)
        };

        let Some((path, distance_cm, elevation_gain_cm)) =
            self.run_and_measure(graph, source, target, w)
        else {
            return Err(RouteError::Unreachable {
                from: source,
                to: target,
            });
        };

        let coordinates = path
            .iter()
            .map(|&id| {
                let node = graph.node(id);
                (node.lon, node.lat)
            })
            .collect();

        Ok(RouteResult {
            distance_cm,
            elevation_gain_cm,
            node_count: path.len(),
            coordinates,
        })
    }

    /// Runs one-to-one at `w` with path reconstruction enabled and, if
    /// reachable, sums the *exact* per-edge length and climb along the
    /// reconstructed path (not the weighted cost), so the aggregates are
    /// independent of `w`.
    fn run_and_measure(
        &mut self,
        graph: &Graph,
        source: u32,
        target: u32,
        w: f64,
    ) -> Option<(Vec<u32>, u64, u64)> {
        self.engine.one_to_one_with_path(graph, source, target, w);
        let path = self.engine.reconstruct_path(source, target)?;
        let (distance_cm, climb_cm) = sum_path_metrics(graph, &path);
        Some((path, distance_cm, climb_cm))
    }
}

fn sum_path_metrics(graph: &Graph, path: &[u32]) -> (u64, u64) {
    let mut distance_cm = 0u64;
    let mut climb_cm = 0u64;
    for window in path.windows(2) {
        let (u, v) = (window[0], window[1]);
        let edge = graph
            .edges_from(u)
            .iter()
            .find(|e| e.target == v)
            .expect("reconstructed path must only contain traversed edges");
        distance_cm += u64::from(edge.length_cm);
        climb_cm += u64::from(edge.climb_cm);
    }
    (distance_cm, climb_cm)
}
