//! In-memory geohash index with prefix-range search.
//!
//! Entries are keyed by their geohash at the configured storage precision in
//! a sorted map. A bounding-box query turns the box into prefixes, scans the
//! key range of each prefix, and post-filters the candidates against the
//! exact box.
//!
//! # Example
//!
//! ```
//! use tenerife_geo::geo::{Coordinate, GeohashIndex};
//!
//! let mut venues = GeohashIndex::default();
//! venues.insert(Coordinate::new(28.4682, -16.2546), "Auditorio de Tenerife").unwrap();
//! venues.insert(Coordinate::new(28.0500, -16.7160), "Playa de las Americas").unwrap();
//!
//! let santa_cruz = Coordinate::new(28.4636, -16.2518);
//! let nearby = venues.search_radius(&santa_cruz, 5.0).unwrap();
//!
//! assert_eq!(nearby.len(), 1);
//! assert_eq!(*nearby[0].value, "Auditorio de Tenerife");
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;

use log::{debug, trace};

use super::bbox::{calculate_distance, geohash_prefixes_for_bounding_box, is_within_bounding_box};
use super::cover::geohash_cells_covering_bounding_box;
use super::error::{GeoError, Result};
use super::geohash::encode_coordinate;
use super::settings::{CoverStrategy, GeoSettings};
use super::types::{BoundingBox, Coordinate, EARTH_RADIUS_KM};

/// Padding on the angular radius so rounding never puts a point that is
/// inside the radius outside its search boxes.
const RADIUS_BOX_MARGIN: f64 = 1.01;

/// Boxes enclosing the spherical cap of `radius_km` around `center`.
///
/// The cap reaches `d` radians north and south and `asin(sin d / cos lat)`
/// east and west. A cap over a pole spans every longitude; one over the
/// antimeridian is split in two.
fn radius_search_boxes(center: &Coordinate, radius_km: f64) -> Vec<BoundingBox> {
    let angle = radius_km / EARTH_RADIUS_KM * RADIUS_BOX_MARGIN;
    let lat_delta = angle.to_degrees();
    let min_lat = center.lat - lat_delta;
    let max_lat = center.lat + lat_delta;

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return vec![BoundingBox::new(
            min_lat.max(-90.0),
            max_lat.min(90.0),
            -180.0,
            180.0,
        )];
    }

    let reach = angle.sin() / center.lat.to_radians().cos();
    if reach >= 1.0 {
        return vec![BoundingBox::new(min_lat, max_lat, -180.0, 180.0)];
    }

    let lng_delta = reach.asin().to_degrees();
    let min_lng = center.lng - lng_delta;
    let max_lng = center.lng + lng_delta;
    if min_lng < -180.0 {
        vec![
            BoundingBox::new(min_lat, max_lat, -180.0, max_lng),
            BoundingBox::new(min_lat, max_lat, min_lng + 360.0, 180.0),
        ]
    } else if max_lng > 180.0 {
        vec![
            BoundingBox::new(min_lat, max_lat, min_lng, 180.0),
            BoundingBox::new(min_lat, max_lat, -180.0, max_lng - 360.0),
        ]
    } else {
        vec![BoundingBox::new(min_lat, max_lat, min_lng, max_lng)]
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    coordinate: Coordinate,
    value: T,
}

/// A radius search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby<'a, T> {
    /// The indexed value
    pub value: &'a T,
    /// Where it was indexed
    pub coordinate: Coordinate,
    /// Haversine distance from the search centre
    pub distance_km: f64,
}

/// Geohash-keyed spatial index.
#[derive(Debug, Clone)]
pub struct GeohashIndex<T> {
    settings: GeoSettings,
    entries: BTreeMap<String, Vec<Entry<T>>>,
    len: usize,
}

impl<T> Default for GeohashIndex<T> {
    fn default() -> Self {
        Self {
            settings: GeoSettings::default(),
            entries: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<T> GeohashIndex<T> {
    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidSettings`] if `settings` fail validation.
    pub fn new(settings: GeoSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            entries: BTreeMap::new(),
            len: 0,
        })
    }

    /// Returns the settings this index was built with.
    #[must_use]
    pub const fn settings(&self) -> &GeoSettings {
        &self.settings
    }

    /// Number of indexed entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the index holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indexes `value` at `coordinate` and returns its geohash key.
    ///
    /// # Errors
    ///
    /// Returns a coordinate error if `coordinate` is out of range.
    pub fn insert(&mut self, coordinate: Coordinate, value: T) -> Result<String> {
        let geohash = encode_coordinate(&coordinate, self.settings.storage_precision)?;
        self.entries
            .entry(geohash.clone())
            .or_default()
            .push(Entry { coordinate, value });
        self.len += 1;
        Ok(geohash)
    }

    /// Iterates over every entry whose geohash starts with `prefix`.
    pub fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a Coordinate, &'a T)> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .flat_map(|(_, bucket)| bucket.iter().map(|e| (&e.coordinate, &e.value)))
    }

    fn prefixes_for(&self, bbox: &BoundingBox) -> Result<Vec<String>> {
        match self.settings.cover_strategy {
            CoverStrategy::Exact => {
                geohash_cells_covering_bounding_box(bbox, self.settings.prefix_precision)
            }
            CoverStrategy::Sampled => {
                geohash_prefixes_for_bounding_box(bbox, self.settings.prefix_precision)
            }
        }
    }

    fn candidates(&self, bbox: &BoundingBox) -> Result<Vec<(&Coordinate, &T)>> {
        if !bbox.is_ordered() {
            return Err(GeoError::InvalidBoundingBox(format!(
                "edges must satisfy min <= max, got {bbox:?}"
            )));
        }

        let prefixes = self.prefixes_for(bbox)?;
        let mut scanned = 0usize;
        let mut hits = Vec::new();
        for prefix in &prefixes {
            let before = scanned;
            let range = (Bound::Included(prefix.as_str()), Bound::Unbounded);
            for (key, bucket) in self.entries.range::<str, _>(range) {
                if !key.starts_with(prefix.as_str()) {
                    break;
                }
                for entry in bucket {
                    scanned += 1;
                    if is_within_bounding_box(&entry.coordinate, bbox) {
                        hits.push((&entry.coordinate, &entry.value));
                    }
                }
            }
            trace!("Prefix {prefix}: {} candidates", scanned - before);
        }

        debug!(
            "Box search over {} prefixes scanned {scanned} entries, {} matched",
            prefixes.len(),
            hits.len()
        );
        Ok(hits)
    }

    /// Returns every value inside `bbox` (edges inclusive).
    ///
    /// With [`CoverStrategy::Sampled`] values in cells the sampling grid
    /// skipped are not returned.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidBoundingBox`] when the box has NaN or inverted edges.
    /// - Coordinate errors from sampled prefixes of an out-of-range box.
    pub fn search_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<&T>> {
        Ok(self
            .candidates(bbox)?
            .into_iter()
            .map(|(_, value)| value)
            .collect())
    }

    /// Returns values within `radius_km` of `center`, nearest first.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidBoundingBox`] for a negative or NaN radius.
    /// - [`GeoError::InvalidLatitude`] or [`GeoError::InvalidLongitude`] for an
    ///   out-of-range centre.
    pub fn search_radius(&self, center: &Coordinate, radius_km: f64) -> Result<Vec<Nearby<'_, T>>> {
        if radius_km.is_nan() || radius_km < 0.0 {
            return Err(GeoError::InvalidBoundingBox(format!(
                "radius must be a non-negative distance, got {radius_km}"
            )));
        }
        if !(-90.0..=90.0).contains(&center.lat) {
            return Err(GeoError::InvalidLatitude(center.lat));
        }
        if !(-180.0..=180.0).contains(&center.lng) {
            return Err(GeoError::InvalidLongitude(center.lng));
        }

        let mut nearby = Vec::new();
        for bbox in radius_search_boxes(center, radius_km) {
            for (coordinate, value) in self.candidates(&bbox)? {
                let distance_km = calculate_distance(center, coordinate);
                if distance_km <= radius_km {
                    nearby.push(Nearby {
                        value,
                        coordinate: *coordinate,
                        distance_km,
                    });
                }
            }
        }

        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(nearby)
    }
}
