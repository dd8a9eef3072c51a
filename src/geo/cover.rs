//! Exact geohash cover of a bounding box.
//!
//! Unlike the sampled prefixes in [`bbox`](super::bbox), the cover is built
//! by recursive cell subdivision with overlap tests, so every point inside the
//! box has a geohash starting with one of the returned cells.

use log::debug;

use super::error::{GeoError, Result};
use super::geohash::geohash_bounds;
use super::types::{BoundingBox, GEOHASH_ALPHABET, MAX_PRECISION};

/// Returns the geohash cells that exactly cover `bbox`.
///
/// Subdivision starts from the 32 top-level cells. A cell that does not touch
/// the box is dropped; a cell wholly inside the box is emitted as is, even if
/// it is shorter than `precision`; any other cell is split until it reaches
/// `precision` characters. Edges are inclusive, so cells that merely touch
/// the box are kept.
///
/// The result is sorted and no entry is a prefix of another, which makes it
/// directly usable as a set of disjoint prefix-range scans.
///
/// # Errors
///
/// - [`GeoError::InvalidPrecision`] for a precision of 0 or above 12.
/// - [`GeoError::InvalidBoundingBox`] when the box has NaN or inverted edges.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::{encode_geohash, geohash_cells_covering_bounding_box, BoundingBox};
///
/// let bbox = BoundingBox::new(28.0, 28.6, -16.95, -16.1);
/// let cells = geohash_cells_covering_bounding_box(&bbox, 4).unwrap();
///
/// let teide = encode_geohash(28.2724, -16.6425, 9).unwrap();
/// assert!(cells.iter().any(|cell| teide.starts_with(cell.as_str())));
/// ```
pub fn geohash_cells_covering_bounding_box(
    bbox: &BoundingBox,
    precision: u8,
) -> Result<Vec<String>> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoError::InvalidPrecision(precision));
    }
    if !bbox.is_ordered() {
        return Err(GeoError::InvalidBoundingBox(format!(
            "edges must satisfy min <= max, got {bbox:?}"
        )));
    }

    let mut cells = Vec::new();
    let mut pending: Vec<String> = GEOHASH_ALPHABET
        .iter()
        .rev()
        .map(|&c| char::from(c).to_string())
        .collect();

    // Depth-first with children pushed in reverse so output stays sorted.
    while let Some(cell) = pending.pop() {
        let bounds = BoundingBox::from(geohash_bounds(&cell)?);
        if !bounds.intersects(bbox) {
            continue;
        }
        if bbox.contains_box(&bounds) || cell.len() >= usize::from(precision) {
            cells.push(cell);
            continue;
        }
        for &c in GEOHASH_ALPHABET.iter().rev() {
            let mut child = String::with_capacity(cell.len() + 1);
            child.push_str(&cell);
            child.push(char::from(c));
            pending.push(child);
        }
    }

    debug!(
        "Covered bounding box at precision {precision} with {} cells",
        cells.len()
    );

    Ok(cells)
}
