//! SRTM `.hgt` tile loading, caching, and bilinear-on-triangles
//! interpolation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ElevationError;

/// Side length of an SRTM-1 tile grid (3601 samples per degree at 1
/// arc-second resolution, inclusive of both edges).
const TILE_SIDE: usize = 3601;
const TILE_SAMPLES: usize = TILE_SIDE * TILE_SIDE;
const TILE_BYTES: usize = TILE_SAMPLES * 2;

/// One decoded `.hgt` tile: a dense grid of signed 16-bit meters, row 0 is
/// the northernmost row, column 0 is the westernmost column. Never
/// mutated after decode.
struct Tile {
    heights: Box<[i16; TILE_SAMPLES]>,
}

impl Tile {
    fn height_at(&self, row: usize, col: usize) -> i16 {
        self.heights[row * TILE_SIDE + col]
    }

    fn decode(bytes: &[u8]) -> Box<[i16; TILE_SAMPLES]> {
        let mut heights = Box::new([0i16; TILE_SAMPLES]);
        for (i, chunk) in bytes.chunks_exact(2).enumerate() {
            heights[i] = i16::from_be_bytes([chunk[0], chunk[1]]);
        }
        heights
    }
}

/// Resolves `(lat, lon) -> elevation in cm` against a directory of SRTM
/// `.hgt` tiles, caching every tile it has ever opened with no eviction.
pub struct ElevationStore {
    tile_dir: PathBuf,
    cache: HashMap<(i32, i32), Arc<Tile>>,
}

impl ElevationStore {
    #[must_use]
    pub fn new(tile_dir: impl Into<PathBuf>) -> Self {
        Self {
            tile_dir: tile_dir.into(),
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    /// Returns the elevation at `(lat, lon)` in centimeters, loading and
    /// caching the covering tile on first access.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError`] if the covering tile is missing, unreadable,
    /// or not exactly the expected SRTM-1 byte length.
    pub fn elevation_cm(&mut self, lat: f64, lon: f64) -> Result<i32, ElevationError> {
        let key = (lat.floor() as i32, lon.floor() as i32);
        let tile = self.tile_for(key)?;

        let fr_lat = lat - f64::from(key.0);
        let fr_lon = lon - f64::from(key.1);
        Ok(interpolate(&tile, fr_lat, fr_lon))
    }

    fn tile_for(&mut self, key: (i32, i32)) -> Result<Arc<Tile>, ElevationError> {
        if let Some(tile) = self.cache.get(&key) {
            return Ok(Arc::clone(tile));
        }

        let path = self.tile_dir.join(tile_filename(key));
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ElevationError::TileNotFound {
                lat: f64::from(key.0),
                lon: f64::from(key.1),
                path: path.display().to_string(),
            },
            _ => ElevationError::Io {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        if bytes.len() != TILE_BYTES {
            return Err(ElevationError::CorruptTile {
                path: path.display().to_string(),
                expected: TILE_BYTES,
                actual: bytes.len(),
            });
        }

        let tile = Arc::new(Tile {
            heights: Tile::decode(&bytes),
        });
        tracing::debug!(path = %path.display(), "loaded elevation tile");
        self.cache.insert(key, Arc::clone(&tile));
        Ok(tile)
    }
}

/// `{N|S}DD{E|W}DDD.hgt`, keyed by the floor of the tile's southern
/// latitude and western longitude.
fn tile_filename((lat, lon): (i32, i32)) -> String {
    let (lat_hemi, lat_abs) = if lat >= 0 { ('N', lat) } else { ('S', -lat) };
    let (lon_hemi, lon_abs) = if lon >= 0 { ('E', lon) } else { ('W', -lon) };
    format!("{lat_hemi}{lat_abs:02}{lon_hemi}{lon_abs:03}.hgt")
}

/// Barycentric interpolation on the two triangles of the unit square
/// spanned by the four grid corners enclosing `(fr_lat, fr_lon)`, as
/// described in the elevation raster store design.
fn interpolate(tile: &Tile, fr_lat: f64, fr_lon: f64) -> i32 {
    let max_index = (TILE_SIDE - 1) as f64;
    let row = (1.0 - fr_lat) * max_index;
    let col = fr_lon * max_index;

    let r0 = row.floor() as usize;
    let c0 = col.floor() as usize;
    let r1 = (r0 + 1).min(TILE_SIDE - 1);
    let c1 = (c0 + 1).min(TILE_SIDE - 1);
    let rf = row - r0 as f64;
    let cf = col - c0 as f64;

    let h00 = tile.height_at(r0, c0);
    let h01 = tile.height_at(r0, c1);
    let h10 = tile.height_at(r1, c0);
    let h11 = tile.height_at(r1, c1);

    interpolate_cell(h00, h01, h10, h11, rf, cf)
}

/// Barycentric interpolation over the unit square `(rf, cf) in [0,1)^2`
/// spanned by four corner heights, split across the two triangles sharing
/// the anti-diagonal `r + c = 1`. Returns centimeters.
fn interpolate_cell(h00: i16, h01: i16, h10: i16, h11: i16, rf: f64, cf: f64) -> i32 {
    let (h00, h01, h10, h11) = (f64::from(h00), f64::from(h01), f64::from(h10), f64::from(h11));
    let meters = if rf + cf <= 1.0 {
        (1.0 - rf - cf) * h00 + cf * h01 + rf * h10
    } else {
        (rf + cf - 1.0) * h11 + (1.0 - rf) * h01 + (1.0 - cf) * h10
    };

    round_half_away_from_zero(meters * 100.0)
}

fn round_half_away_from_zero(x: f64) -> i32 {
    #[expect(clippy::cast_possible_truncation)]
    let rounded = if x >= 0.0 {
        (x + 0.5).floor() as i32
    } else {
        (x - 0.5).ceil() as i32
    };
    rounded
}

/// The default tile directory for a graph file at `graph_path`: a
/// sibling directory named `srtm`, per the SRTM tile external interface.
#[must_use]
pub fn default_tile_dir(graph_path: &Path) -> PathBuf {
    graph_path
        .parent()
        .map(|p| p.join("srtm"))
        .unwrap_or_else(|| PathBuf::from("srtm"))
}
