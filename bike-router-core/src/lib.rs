//! Core routing engine for bicycle route cost queries over a country-scale
//! road graph.
//!
//! This crate owns the parts of the system that are the hard engineering:
//! the compact adjacency-array graph, the SRTM elevation raster store, the
//! weighted Dijkstra search (one-to-one, one-to-all, with path
//! reconstruction), the pure cost function, the slider-driven Route
//! Service, and the linear-scan nearest-node index. HTTP transport,
//! benchmark CLI argument parsing, and the map front-end are deliberately
//! kept out of this crate; see `bike-router-bench` and
//! `bike-router-service`.

pub mod cost;
pub mod dijkstra;
pub mod elevation;
pub mod error;
pub mod graph;
pub mod loader;
pub mod nearest;
pub mod route;

pub use cost::edge_cost;
pub use dijkstra::DijkstraEngine;
pub use elevation::ElevationStore;
pub use error::{ElevationError, GraphLoadError, RouteError};
pub use graph::{Edge, Graph, Node};
pub use loader::{assign_elevations, load_fmi};
pub use nearest::nearest;
pub use route::{RouteResult, RouteService};
