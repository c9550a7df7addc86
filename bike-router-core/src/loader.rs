//! Parses the textual `.fmi` graph format into a frozen [`Graph`].

use std::fs;
use std::path::Path;

use crate::elevation::ElevationStore;
use crate::error::{ElevationError, GraphLoadError};
use crate::graph::{Edge, Graph};

/// Reads and parses a `.fmi` file at `path`, producing a [`Graph`] with
/// node positions filled in and edges laid out contiguously by source.
/// Elevations and climbs are left at zero; call [`crate::elevation`]-based
/// backfilling afterward.
///
/// # Errors
///
/// Returns [`GraphLoadError`] if `path` can't be read, or if the file is
/// malformed or truncated relative to its declared node/edge counts.
pub fn load_fmi(path: impl AsRef<Path>) -> Result<Graph, GraphLoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| GraphLoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_fmi(&text)
}

/// Walks every node in id order, resolves its elevation through `store`,
/// and then recomputes every edge's climb. This is the caller-side
/// backfill step described in the loader design: the loader itself never
/// touches elevation, since it has no [`ElevationStore`] to consult.
///
/// # Errors
///
/// Returns [`ElevationError`] if any node's covering tile can't be found
/// or read.
pub fn assign_elevations(graph: &mut Graph, store: &mut ElevationStore) -> Result<(), ElevationError> {
    tracing::info!("assigning node elevations");
    for id in 0..graph.node_count() as u32 {
        let node = graph.node(id);
        let elevation_cm = store.elevation_cm(node.lat, node.lon)?;
        graph.set_elevation_cm(id, elevation_cm);
    }
    tracing::info!("recomputing edge climbs");
    graph.update_edge_climbs();
    Ok(())
}

/// Parses the `.fmi` text format directly, for callers that already have
/// the file contents in memory (e.g. tests).
///
/// # Errors
///
/// Returns [`GraphLoadError`] if `text` is malformed or truncated relative
/// to its declared node/edge counts.
pub fn parse_fmi(text: &str) -> Result<Graph, GraphLoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    let (count_line, count_text) = lines
        .next()
        .ok_or(GraphLoadError::MissingCountLine { line: 1 })?;
    let node_count: usize = count_text.trim().parse().map_err(|_| GraphLoadError::MalformedCount {
        line: count_line,
        text: count_text.to_string(),
    })?;

    let (count_line, count_text) = lines
        .next()
        .ok_or(GraphLoadError::MissingCountLine { line: count_line + 1 })?;
    let edge_count: usize = count_text.trim().parse().map_err(|_| GraphLoadError::MalformedCount {
        line: count_line,
        text: count_text.to_string(),
    })?;

    tracing::info!(node_count, edge_count, "parsing graph file");

    let mut graph = Graph::with_capacity(node_count, edge_count);

    let mut nodes_seen = 0;
    for _ in 0..node_count {
        let Some((line, text)) = lines.next() else {
            return Err(GraphLoadError::TruncatedNodes {
                lines_seen: nodes_seen,
                expected: node_count,
            });
        };
        let mut fields = text.split_ascii_whitespace();
        let id: i64 = parse_field(&mut fields, line, text, GraphLoadError::MalformedNode)?;
        let _osm_id: &str = fields.next().ok_or_else(|| GraphLoadError::MalformedNode {
            line,
            text: text.to_string(),
        })?;
        let lat: f64 = parse_field(&mut fields, line, text, GraphLoadError::MalformedNode)?;
        let lon: f64 = parse_field(&mut fields, line, text, GraphLoadError::MalformedNode)?;

        if id < 0 || id as usize >= node_count {
            return Err(GraphLoadError::NodeIdOutOfRange {
                line,
                id,
                node_count,
            });
        }
        #[expect(clippy::cast_sign_loss)]
        let id = id as u32;
        graph.node_mut(id).lat = lat;
        graph.node_mut(id).lon = lon;
        nodes_seen += 1;
    }

    let mut edges_seen = 0;
    let mut current_source: i64 = -1;
    let mut edge_index: u32 = 0;
    for _ in 0..edge_count {
        let Some((line, text)) = lines.next() else {
            return Err(GraphLoadError::TruncatedEdges {
                lines_seen: edges_seen,
                expected: edge_count,
            });
        };
        let mut fields = text.split_ascii_whitespace();
        let source: i64 = parse_field(&mut fields, line, text, GraphLoadError::MalformedEdge)?;
        let target: i64 = parse_field(&mut fields, line, text, GraphLoadError::MalformedEdge)?;
        let length_cm: u32 = parse_field(&mut fields, line, text, GraphLoadError::MalformedEdge)?;
        let _edge_type: &str = fields.next().ok_or_else(|| GraphLoadError::MalformedEdge {
            line,
            text: text.to_string(),
        })?;

        if source < 0 || source as usize >= node_count {
            return Err(GraphLoadError::SourceOutOfRange {
                line,
                source,
                node_count,
            });
        }
        if target < 0 || target as usize >= node_count {
            return Err(GraphLoadError::TargetOutOfRange {
                line,
                target,
                node_count,
            });
        }

        // Edges are guaranteed sorted by source; backfill offsets for any
        // source nodes we've skipped over (including those with no
        // outgoing edges at all).
        while current_source < source {
            current_source += 1;
            #[expect(clippy::cast_sign_loss)]
            let idx = current_source as usize;
            graph.offsets_mut()[idx] = edge_index;
        }

        #[expect(clippy::cast_sign_loss)]
        let target_id = target as u32;
        graph.edges_mut()[edge_index as usize] = Edge {
            target: target_id,
            length_cm,
            climb_cm: 0,
        };
        edge_index += 1;
        edges_seen += 1;
    }

    // Fill any trailing offsets for source nodes past the last edge's source
    // (including the final sentinel offsets[node_count] = edge_count).
    #[expect(clippy::cast_possible_wrap)]
    let node_count_signed = node_count as i64;
    while current_source < node_count_signed {
        current_source += 1;
        #[expect(clippy::cast_sign_loss)]
        let idx = current_source as usize;
        graph.offsets_mut()[idx] = edge_index;
    }

    Ok(graph)
}

fn parse_field<T: std::str::FromStr>(
    fields: &mut std::str::SplitAsciiWhitespace,
    line: usize,
    text: &str,
    err: impl Fn(usize, String) -> GraphLoadError,
) -> Result<T, GraphLoadError> {
    fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| err(line, text.to_string()))
}
