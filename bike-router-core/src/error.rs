use thiserror::Error;

/// Fatal conditions encountered while parsing a `.fmi` graph file.
///
/// Every variant here terminates the current startup phase; there is no
/// recovery path once the loader has given up on a line.
#[derive(Debug, Error)]
pub enum GraphLoadError {
    #[error("failed to read graph file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("expected a node/edge count on line {line}, found nothing")]
    MissingCountLine { line: usize },

    #[error("malformed count on line {line}: {text:?}")]
    MalformedCount { line: usize, text: String },

    #[error(
        "graph file ended after {lines_seen} lines but {expected} node lines were declared"
    )]
    TruncatedNodes { lines_seen: usize, expected: usize },

    #[error(
        "graph file ended after {lines_seen} lines but {expected} edge lines were declared"
    )]
    TruncatedEdges { lines_seen: usize, expected: usize },

    #[error("node line {line} has a non-numeric field: {text:?}")]
    MalformedNode { line: usize, text: String },

    #[error("edge line {line} has a non-numeric field: {text:?}")]
    MalformedEdge { line: usize, text: String },

    #[error("node line {line} declares id {id}, which is out of range [0, {node_count})")]
    NodeIdOutOfRange {
        line: usize,
        id: i64,
        node_count: usize,
    },

    #[error("edge line {line} targets node {target}, which is out of range [0, {node_count})")]
    TargetOutOfRange {
        line: usize,
        target: i64,
        node_count: usize,
    },

    #[error("edge line {line} has source {source}, which is out of range [0, {node_count})")]
    SourceOutOfRange {
        line: usize,
        source: i64,
        node_count: usize,
    },
}

/// Fatal conditions encountered while resolving an elevation sample.
#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("elevation tile {path} not found for ({lat}, {lon})")]
    TileNotFound {
        lat: f64,
        lon: f64,
        path: String,
    },

    #[error(
        "elevation tile {path} is corrupt: expected {expected} bytes, found {actual}"
    )]
    CorruptTile {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read elevation tile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Non-fatal routing outcomes surfaced to a caller (benchmark sentinel or HTTP error body).
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route exists between node {from} and node {to}")]
    Unreachable { from: u32, to: u32 },
}
