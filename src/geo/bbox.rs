//! Bounding-box construction, containment, distance and prefix sampling.

use std::collections::BTreeSet;

use log::debug;

use super::error::Result;
use super::geohash::encode_geohash;
use super::types::{BoundingBox, Coordinate, EARTH_RADIUS_KM, KM_PER_DEGREE_LAT, SAMPLES_PER_DEGREE};

/// Number of sampling intervals along one axis: `max(2, ceil(span * 20))`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_steps(span: f64) -> u32 {
    let steps = (span * SAMPLES_PER_DEGREE).ceil();
    if steps.is_nan() || steps < 2.0 {
        2
    } else {
        // Saturating float-to-int cast
        steps as u32
    }
}

/// Position of grid node `i` of `steps` between `min` and `max`, both ends included.
fn grid_node(min: f64, max: f64, i: u32, steps: u32) -> f64 {
    if i == steps {
        max
    } else {
        (max - min).mul_add(f64::from(i) / f64::from(steps), min).min(max)
    }
}

/// Returns geohash prefixes whose cells approximately cover `bbox`.
///
/// A sampling grid of `max(2, ceil(lat_span * 20))` by
/// `max(2, ceil(lng_span * 20))` intervals is laid over the box and every
/// node, edges included, is encoded at `precision`. The result is
/// de-duplicated and sorted, ready for prefix scans over a sorted index.
///
/// This is a coverage heuristic. Returned cells may extend beyond the box, so
/// candidates must be post-filtered with [`is_within_bounding_box`]. Cells
/// narrower than the sampling interval can be missed; use
/// [`geohash_cells_covering_bounding_box`](super::cover::geohash_cells_covering_bounding_box)
/// when completeness matters.
///
/// # Errors
///
/// Propagates [`encode_geohash`] errors for boxes outside the valid
/// coordinate range or an invalid precision.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::{geohash_prefixes_for_bounding_box, BoundingBox};
///
/// // La Laguna old town
/// let bbox = BoundingBox::new(28.48, 28.49, -16.32, -16.31);
/// let prefixes = geohash_prefixes_for_bounding_box(&bbox, 5).unwrap();
/// assert!(!prefixes.is_empty());
/// assert!(prefixes.iter().all(|p| p.len() == 5));
/// ```
pub fn geohash_prefixes_for_bounding_box(bbox: &BoundingBox, precision: u8) -> Result<Vec<String>> {
    let lat_steps = sample_steps(bbox.lat_span());
    let lng_steps = sample_steps(bbox.lng_span());

    let mut prefixes = BTreeSet::new();
    for i in 0..=lat_steps {
        let lat = grid_node(bbox.min_lat, bbox.max_lat, i, lat_steps);
        for j in 0..=lng_steps {
            let lng = grid_node(bbox.min_lng, bbox.max_lng, j, lng_steps);
            prefixes.insert(encode_geohash(lat, lng, precision)?);
        }
    }

    debug!(
        "Sampled {}x{} grid at precision {precision}: {} prefixes",
        lat_steps + 1,
        lng_steps + 1,
        prefixes.len()
    );

    Ok(prefixes.into_iter().collect())
}

/// Great-circle distance in kilometres using the Haversine formula.
///
/// Identical points yield 0. Antipodal points yield about 20015 km; the
/// formula's precision loss near antipodes is not compensated.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::{calculate_distance, Coordinate};
///
/// let santa_cruz = Coordinate::new(28.4636, -16.2518);
/// let los_cristianos = Coordinate::new(28.0916, -16.7336);
///
/// let km = calculate_distance(&santa_cruz, &los_cristianos);
/// assert!(km > 60.0 && km < 65.0);
/// ```
#[must_use]
pub fn calculate_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Builds a box approximating a circle of `radius_km` around `center`.
///
/// Latitude delta is `radius / 111.32`; longitude delta is
/// `radius / (111.32 * cos(lat))`, widening toward the poles. The result is
/// not clamped to valid coordinates, and a centre exactly on a pole gives an
/// infinite longitude delta.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::{create_bounding_box, is_within_bounding_box, Coordinate};
///
/// let center = Coordinate::new(28.1, -16.7);
/// let bbox = create_bounding_box(&center, 10.0);
///
/// assert!(is_within_bounding_box(&center, &bbox));
/// assert!(!is_within_bounding_box(&Coordinate::new(28.55, -16.7), &bbox));
/// ```
#[must_use]
pub fn create_bounding_box(center: &Coordinate, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE_LAT;
    let lng_delta = radius_km / (KM_PER_DEGREE_LAT * center.lat.to_radians().cos());

    BoundingBox::new(
        center.lat - lat_delta,
        center.lat + lat_delta,
        center.lng - lng_delta,
        center.lng + lng_delta,
    )
}

/// Inclusive containment check.
///
/// Boxes crossing the antimeridian (`min_lng > max_lng`) are not supported
/// and contain no points.
#[must_use]
pub fn is_within_bounding_box(coord: &Coordinate, bbox: &BoundingBox) -> bool {
    coord.lat >= bbox.min_lat
        && coord.lat <= bbox.max_lat
        && coord.lng >= bbox.min_lng
        && coord.lng <= bbox.max_lng
}

#[cfg(test)]
mod tests {
    // Grid nodes and the zero distance are exact by construction, so these
    // tests compare floats for bit-exact equality.
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::geo::error::GeoError;
    use crate::geo::geohash::geohash_bounds;

    #[test]
    fn sample_steps_has_floor_of_two() {
        assert_eq!(sample_steps(0.0), 2);
        assert_eq!(sample_steps(0.01), 2);
        assert_eq!(sample_steps(0.1), 2);
        assert_eq!(sample_steps(0.5), 10);
        assert_eq!(sample_steps(1.01), 21);
        assert_eq!(sample_steps(f64::NAN), 2);
    }

    #[test]
    fn grid_node_hits_both_edges() {
        assert_eq!(grid_node(28.0, 28.3, 0, 3), 28.0);
        assert_eq!(grid_node(28.0, 28.3, 3, 3), 28.3);
        assert!((grid_node(28.0, 28.3, 1, 3) - 28.1).abs() < 1e-12);
    }

    #[test]
    fn prefixes_for_tiny_box_are_not_empty() {
        let bbox = BoundingBox::new(28.463, 28.464, -16.252, -16.251);
        let prefixes = geohash_prefixes_for_bounding_box(&bbox, 5).unwrap();
        assert_eq!(prefixes, vec!["eth3y".to_string()]);
    }

    #[test]
    fn prefixes_for_degenerate_point_box() {
        let bbox = BoundingBox::new(28.1, 28.1, -16.7, -16.7);
        let prefixes = geohash_prefixes_for_bounding_box(&bbox, 7).unwrap();
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0], encode_geohash(28.1, -16.7, 7).unwrap());
    }

    #[test]
    fn prefixes_include_corner_encodings() {
        let bbox = BoundingBox::new(27.99, 28.6, -16.95, -16.1);
        let prefixes = geohash_prefixes_for_bounding_box(&bbox, 5).unwrap();

        for (lat, lng) in [
            (bbox.min_lat, bbox.min_lng),
            (bbox.min_lat, bbox.max_lng),
            (bbox.max_lat, bbox.min_lng),
            (bbox.max_lat, bbox.max_lng),
        ] {
            let corner = encode_geohash(lat, lng, 5).unwrap();
            assert!(prefixes.contains(&corner), "missing corner {corner}");
        }
    }

    #[test]
    fn prefixes_are_sorted_unique_and_intersect_box() {
        let bbox = BoundingBox::new(28.0, 28.6, -16.9, -16.1);
        let prefixes = geohash_prefixes_for_bounding_box(&bbox, 5).unwrap();

        let mut sorted = prefixes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(prefixes, sorted);

        for prefix in &prefixes {
            assert!(geohash_bounds(prefix).unwrap().intersects(&bbox));
        }
    }

    #[test]
    fn prefixes_reject_out_of_range_box() {
        let bbox = BoundingBox::new(89.5, 91.0, 0.0, 1.0);
        assert!(matches!(
            geohash_prefixes_for_bounding_box(&bbox, 5),
            Err(GeoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn distance_identity_is_zero() {
        let p = Coordinate::new(28.46, -16.25);
        assert_eq!(calculate_distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(28.4636, -16.2518);
        let b = Coordinate::new(28.0916, -16.7336);
        assert!((calculate_distance(&a, &b) - calculate_distance(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn distance_between_tenerife_towns() {
        let santa_cruz = Coordinate::new(28.463_629_6, -16.251_846_7);
        let los_cristianos = Coordinate::new(28.0916, -16.7336);
        let km = calculate_distance(&santa_cruz, &los_cristianos);
        assert!((km - 62.74).abs() < 0.1, "got {km}");
    }

    #[test]
    fn distance_antipodal_is_half_circumference() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let km = calculate_distance(&a, &b);
        assert!((km - 20_015.09).abs() < 0.1, "got {km}");
    }

    #[test]
    fn distance_propagates_nan() {
        let a = Coordinate::new(f64::NAN, 0.0);
        let b = Coordinate::new(0.0, 0.0);
        assert!(calculate_distance(&a, &b).is_nan());
    }

    #[test]
    fn bounding_box_around_tenerife_center() {
        let center = Coordinate::new(28.1, -16.7);
        let bbox = create_bounding_box(&center, 10.0);

        assert!((bbox.lat_span() - 20.0 / 111.32).abs() < 1e-9);
        assert!(bbox.lng_span() > bbox.lat_span());
        assert!(is_within_bounding_box(&center, &bbox));

        // ~50 km north
        let far = Coordinate::new(28.1 + 50.0 / 111.32, -16.7);
        assert!(!is_within_bounding_box(&far, &bbox));
    }

    #[test]
    fn bounding_box_is_symmetric_around_center() {
        let center = Coordinate::new(28.1, -16.7);
        let bbox = create_bounding_box(&center, 5.0);
        assert!(((bbox.min_lat + bbox.max_lat) / 2.0 - center.lat).abs() < 1e-9);
        assert!(((bbox.min_lng + bbox.max_lng) / 2.0 - center.lng).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_at_pole_has_unbounded_longitude() {
        let bbox = create_bounding_box(&Coordinate::new(90.0, 0.0), 10.0);
        // cos(90°) is ~6e-17 in floating point, so the delta is huge rather than infinite
        assert!(bbox.lng_span() > 1e10);
    }

    #[test]
    fn containment_is_inclusive() {
        let bbox = BoundingBox::new(28.0, 28.5, -17.0, -16.0);
        assert!(is_within_bounding_box(&Coordinate::new(28.0, -17.0), &bbox));
        assert!(is_within_bounding_box(&Coordinate::new(28.5, -16.0), &bbox));
        assert!(!is_within_bounding_box(&Coordinate::new(28.500_001, -16.5), &bbox));
        assert!(!is_within_bounding_box(&Coordinate::new(28.2, -15.999_999), &bbox));
    }

    #[test]
    fn containment_does_not_wrap_antimeridian() {
        // A box meant to span 170°E..170°W is stored with min_lng > max_lng
        let bbox = BoundingBox::new(-10.0, 10.0, 170.0, -170.0);
        assert!(!is_within_bounding_box(&Coordinate::new(0.0, 175.0), &bbox));
        assert!(!is_within_bounding_box(&Coordinate::new(0.0, -175.0), &bbox));
        assert!(!is_within_bounding_box(&Coordinate::new(0.0, 0.0), &bbox));
    }
}
