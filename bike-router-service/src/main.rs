//! Interactive HTTP API over a loaded graph: nearest-node lookup,
//! slider-driven routing, and the graph's bounding box. The map front-end
//! itself is out of scope; this only serves a placeholder static
//! directory alongside the JSON endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use bike_router_core::elevation::{default_tile_dir, ElevationStore};
use bike_router_core::loader::{assign_elevations, load_fmi};

mod error;
mod extract;
mod handlers;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "bike-router-service", author, version, about, long_about = None)]
struct Cli {
    /// Path to the `.fmi` graph file to serve.
    #[arg(env, long)]
    graph: PathBuf,

    /// Overrides the default sibling `srtm` directory next to the graph file.
    #[arg(env, long)]
    srtm_dir: Option<PathBuf>,

    /// Address to listen on.
    #[arg(env, long, default_value = "127.0.0.1:8080")]
    listen_addr: SocketAddr,

    /// Directory of static front-end assets to serve at `/`.
    #[arg(env, long, default_value = "demos")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env()))
        .init();

    let cli = Cli::parse();

    let load_start = Instant::now();
    let mut graph = load_fmi(&cli.graph)
        .with_context(|| format!("failed to load graph at {}", cli.graph.display()))?;
    tracing::info!(elapsed = ?load_start.elapsed(), nodes = graph.node_count(), edges = graph.edge_count(), "graph loaded");

    let tile_dir = cli.srtm_dir.clone().unwrap_or_else(|| default_tile_dir(&cli.graph));
    let mut store = ElevationStore::new(tile_dir);
    assign_elevations(&mut graph, &mut store).context("failed to backfill node elevations")?;
    tracing::info!(cached_tiles = store.cached_tiles(), "elevations assigned and edge climbs recomputed");

    let state = Arc::new(AppState::new(graph));

    let app = Router::new()
        .route("/nearest", get(handlers::get_nearest))
        .route("/route", get(handlers::get_route))
        .route("/bounds", get(handlers::get_bounds))
        .fallback_service(ServeDir::new(&cli.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(cli.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen_addr))?;
    tracing::info!(addr = %cli.listen_addr, "listening");

    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
