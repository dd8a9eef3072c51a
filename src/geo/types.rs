//! Geospatial data types.

use serde::{Deserialize, Serialize};

/// The base-32 geohash alphabet (no `a`, `i`, `l`, `o`).
pub const GEOHASH_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Geohash length used when callers have no better choice (~±76 m).
pub const DEFAULT_PRECISION: u8 = 7;

/// Geohash length used for bounding-box search prefixes (~±2.4 km).
pub const DEFAULT_PREFIX_PRECISION: u8 = 5;

/// Longest supported geohash (60 bits).
pub const MAX_PRECISION: u8 = 12;

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude.
pub const KM_PER_DEGREE_LAT: f64 = 111.32;

/// Sampling density of the bounding-box prefix grid, in steps per degree.
pub const SAMPLES_PER_DEGREE: f64 = 20.0;

/// A point on Earth's surface.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180]. The type
/// itself does not validate; functions that need valid input check it.
///
/// # Example
///
/// ```
/// use tenerife_geo::geo::Coordinate;
///
/// let teide = Coordinate::new(28.2724, -16.6425);
/// let json = serde_json::to_string(&teide).unwrap();
/// assert_eq!(json, r#"{"lat":28.2724,"lng":-16.6425}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns whether both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// An axis-aligned latitude/longitude rectangle.
///
/// `min_lat <= max_lat` and `min_lng <= max_lng` are the caller's
/// responsibility. Boxes crossing the antimeridian are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Southern edge
    pub min_lat: f64,
    /// Northern edge
    pub max_lat: f64,
    /// Western edge
    pub min_lng: f64,
    /// Eastern edge
    pub max_lng: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Returns whether the edges are ordered (`min <= max` on both axes).
    ///
    /// NaN edges are never ordered.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lng <= self.max_lng
    }

    /// Returns whether the two boxes share at least one point (edges inclusive).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
            && self.min_lng <= other.max_lng
            && other.min_lng <= self.max_lng
    }

    /// Returns whether `other` lies entirely inside this box (edges inclusive).
    #[must_use]
    pub fn contains_box(&self, other: &Self) -> bool {
        self.min_lat <= other.min_lat
            && other.max_lat <= self.max_lat
            && self.min_lng <= other.min_lng
            && other.max_lng <= self.max_lng
    }
}

/// The exact region represented by a geohash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeohashBounds {
    /// South-west corner
    pub sw: Coordinate,
    /// North-east corner
    pub ne: Coordinate,
}

impl GeohashBounds {
    /// Midpoint of the cell; this is what decoding returns.
    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.sw.lat + self.ne.lat) / 2.0,
            (self.sw.lng + self.ne.lng) / 2.0,
        )
    }

    /// Cell height in degrees of latitude.
    #[must_use]
    pub fn lat_step(&self) -> f64 {
        self.ne.lat - self.sw.lat
    }

    /// Cell width in degrees of longitude.
    #[must_use]
    pub fn lng_step(&self) -> f64 {
        self.ne.lng - self.sw.lng
    }

    /// Returns whether `coord` lies inside the cell (edges inclusive).
    #[must_use]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.sw.lat..=self.ne.lat).contains(&coord.lat)
            && (self.sw.lng..=self.ne.lng).contains(&coord.lng)
    }

    /// Returns whether the cell overlaps `bbox` (edges inclusive).
    #[must_use]
    pub fn intersects(&self, bbox: &BoundingBox) -> bool {
        BoundingBox::from(*self).intersects(bbox)
    }
}

impl From<GeohashBounds> for BoundingBox {
    fn from(bounds: GeohashBounds) -> Self {
        Self::new(bounds.sw.lat, bounds.ne.lat, bounds.sw.lng, bounds.ne.lng)
    }
}

/// Approximate error radius in metres for a geohash of the given length.
///
/// Returns the maximum distance from the cell centre to its edge along the
/// longer axis. This is a constant-time lookup operation.
///
/// # Geohash Precision Table
///
/// | Length | Error      | Typical use          |
/// |--------|------------|----------------------|
/// | 3      | ±78 km     | Island group         |
/// | 5      | ±2.4 km    | Town / search prefix |
/// | 7      | ±76 m      | Venue (default)      |
/// | 9      | ±2.4 m     | Entrance             |
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::geohash_error_radius;
///
/// assert_eq!(geohash_error_radius(7), 76.0);
/// assert_eq!(geohash_error_radius(0), 0.0);
/// ```
#[must_use]
pub const fn geohash_error_radius(precision: u8) -> f64 {
    match precision {
        1 => 2_500_000.0, // ±2500 km
        2 => 630_000.0,   // ±630 km
        3 => 78_000.0,    // ±78 km
        4 => 20_000.0,    // ±20 km
        5 => 2_400.0,     // ±2.4 km
        6 => 610.0,       // ±610 m
        7 => 76.0,        // ±76 m
        8 => 19.0,        // ±19 m
        9 => 2.4,         // ±2.4 m
        10 => 0.6,        // ±0.6 m
        11 => 0.074,      // ±7.4 cm
        12 => 0.019,      // ±1.9 cm
        _ => 0.0,
    }
}
