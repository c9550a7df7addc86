//! Exercises the full loader -> elevation backfill -> batch-query pipeline
//! against a small synthetic fixture, standing in for the real BW
//! benchmark dataset described in the literal end-to-end scenario. The
//! full `bw-bicycle.fmi`/`.hgt`/`.que`/`.sol` dataset is multiple
//! gigabytes and is not available in this workspace, so this test checks
//! the same assertion shape (queries in, `.sol`-format costs out,
//! byte-compatible with `-1` for unreachable) against a fixture small
//! enough to check in.

use bike_router_core::dijkstra::DijkstraEngine;
use bike_router_core::loader::load_fmi;

const FIXTURE_ELEVATIONS_CM: [i32; 4] = [0, 1000, 1000, 0];

#[test]
fn batch_queries_match_the_checked_in_solution_file() {
    let mut graph = load_fmi("tests/fixtures/tiny.fmi").expect("fixture should parse");

    for (id, &elevation_cm) in FIXTURE_ELEVATIONS_CM.iter().enumerate() {
        graph.set_elevation_cm(id as u32, elevation_cm);
    }
    graph.update_edge_climbs();

    let queries = std::fs::read_to_string("tests/fixtures/tiny.que").unwrap();
    let expected = std::fs::read_to_string("tests/fixtures/tiny.sol").unwrap();
    let expected: Vec<i64> = expected
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim().parse().unwrap())
        .collect();

    let mut engine = DijkstraEngine::new(graph.node_count());
    let mut actual = Vec::new();
    for line in queries.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_ascii_whitespace();
        let src: u32 = fields.next().unwrap().parse().unwrap();
        let tgt: u32 = fields.next().unwrap().parse().unwrap();
        let w: f64 = fields.next().unwrap().parse().unwrap();
        actual.push(engine.one_to_one(&graph, src, tgt, w));
    }

    assert_eq!(actual, expected);

    // Every w = 1.0 query must match exactly (the literal scenario's
    // stronger guarantee over and above the 0.03% aggregate tolerance).
    for (line, &cost) in queries
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .zip(actual.iter())
    {
        if line.trim_end().ends_with("1.0") {
            assert!(cost >= 0 || cost == -1);
        }
    }
}

#[test]
#[ignore = "requires the real multi-GB bw-bicycle.fmi/.hgt/.que/.sol dataset, not present in this workspace"]
fn bw_bicycle_benchmark_matches_reference_solution_within_tolerance() {
    // Scenario 6: loading bw-bicycle.fmi and processing its .que file
    // should match the supplied .sol within 0.03% of aggregate cost over
    // 150 queries, with exact matches for every w = 1.0 query. This is
    // documented rather than runnable here; wire it up against the real
    // dataset path when available.
    unimplemented!("wire up against the real BW dataset when available");
}
