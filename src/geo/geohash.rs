//! Geohash encoding and decoding.
//!
//! A geohash interleaves longitude bits (even positions) and latitude bits
//! (odd positions) produced by repeatedly bisecting the coordinate ranges.
//! Every 5 bits select one character of [`GEOHASH_ALPHABET`].
//!
//! Longer geohashes never contradict shorter ones: the encoding of a point at
//! precision `n` is a prefix of its encoding at any precision `> n`.

use super::error::{GeoError, Result};
use super::types::{Coordinate, GeohashBounds, GEOHASH_ALPHABET, MAX_PRECISION};

const BITS_PER_CHAR: u8 = 5;

/// Half-open bisection state for one axis.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn mid(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Narrows to the upper half (`bit == true`) or the lower half.
    fn narrow(&mut self, bit: bool) {
        let mid = self.mid();
        if bit {
            self.min = mid;
        } else {
            self.max = mid;
        }
    }
}

fn check_precision(precision: u8) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoError::InvalidPrecision(precision));
    }
    Ok(())
}

/// Converts latitude/longitude to a geohash string.
///
/// Each additional character shrinks the cell by a factor of 32. A value
/// exactly on a bisection midpoint falls into the upper half.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-90 to 90)
/// * `lng` - Longitude in degrees (-180 to 180)
/// * `precision` - Geohash length (1 to 12, see [`DEFAULT_PRECISION`](super::types::DEFAULT_PRECISION))
///
/// # Errors
///
/// - [`GeoError::InvalidLatitude`] / [`GeoError::InvalidLongitude`] for
///   out-of-range or NaN input. No clamping is performed.
/// - [`GeoError::InvalidPrecision`] for a precision of 0 or above 12.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::encode_geohash;
///
/// let geohash = encode_geohash(28.463_629_6, -16.251_846_7, 7).unwrap();
/// assert_eq!(geohash, "eth3yjt");
///
/// assert!(encode_geohash(91.0, 0.0, 7).is_err());
/// ```
pub fn encode_geohash(lat: f64, lng: f64, precision: u8) -> Result<String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoError::InvalidLatitude(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(GeoError::InvalidLongitude(lng));
    }
    check_precision(precision)?;

    let mut lat_range = Range::new(-90.0, 90.0);
    let mut lng_range = Range::new(-180.0, 180.0);
    let mut geohash = String::with_capacity(usize::from(precision));
    let mut even = true;

    for _ in 0..precision {
        let mut index = 0usize;
        for _ in 0..BITS_PER_CHAR {
            let (range, value) = if even {
                (&mut lng_range, lng)
            } else {
                (&mut lat_range, lat)
            };
            let bit = value >= range.mid();
            range.narrow(bit);
            index = (index << 1) | usize::from(bit);
            even = !even;
        }
        geohash.push(char::from(GEOHASH_ALPHABET[index]));
    }

    Ok(geohash)
}

/// Encodes a [`Coordinate`]; see [`encode_geohash`].
///
/// # Errors
///
/// Same as [`encode_geohash`].
pub fn encode_coordinate(coord: &Coordinate, precision: u8) -> Result<String> {
    encode_geohash(coord.lat, coord.lng, precision)
}

/// Maps a geohash character to its 5-bit value.
fn char_index(character: char, position: usize) -> Result<usize> {
    u8::try_from(character)
        .ok()
        .and_then(|byte| GEOHASH_ALPHABET.iter().position(|&c| c == byte))
        .ok_or(GeoError::InvalidCharacter {
            character,
            position,
        })
}

/// Returns the exact cell a geohash represents.
///
/// Replays the encoder's bisections (longitude first) and keeps the final
/// ranges instead of their midpoint.
///
/// # Errors
///
/// - [`GeoError::EmptyGeohash`] for `""`.
/// - [`GeoError::InvalidCharacter`] for any character outside the alphabet.
///   Matching is case-sensitive.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::geohash_bounds;
///
/// let bounds = geohash_bounds("ezs42").unwrap();
/// assert!((bounds.sw.lat - 42.583).abs() < 0.001);
/// assert!((bounds.ne.lng - -5.581).abs() < 0.001);
/// ```
pub fn geohash_bounds(geohash: &str) -> Result<GeohashBounds> {
    if geohash.is_empty() {
        return Err(GeoError::EmptyGeohash);
    }

    let mut lat_range = Range::new(-90.0, 90.0);
    let mut lng_range = Range::new(-180.0, 180.0);
    let mut even = true;

    for (position, character) in geohash.chars().enumerate() {
        let index = char_index(character, position)?;
        for shift in (0..BITS_PER_CHAR).rev() {
            let bit = (index >> shift) & 1 == 1;
            if even {
                lng_range.narrow(bit);
            } else {
                lat_range.narrow(bit);
            }
            even = !even;
        }
    }

    Ok(GeohashBounds {
        sw: Coordinate::new(lat_range.min, lng_range.min),
        ne: Coordinate::new(lat_range.max, lng_range.max),
    })
}

/// Decodes a geohash string to the centre of its cell.
///
/// Decoding is lossy: the result lies inside the original cell, not
/// necessarily on the originally encoded point.
///
/// # Errors
///
/// Same as [`geohash_bounds`].
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::{decode_geohash, encode_geohash};
///
/// let geohash = encode_geohash(28.463_629_6, -16.251_846_7, 7).unwrap();
/// let decoded = decode_geohash(&geohash).unwrap();
///
/// assert!((decoded.lat - 28.463_629_6).abs() < 0.001);
/// assert!((decoded.lng - -16.251_846_7).abs() < 0.001);
///
/// // 'a' is not part of the geohash alphabet
/// assert!(decode_geohash("a").is_err());
/// ```
pub fn decode_geohash(geohash: &str) -> Result<Coordinate> {
    geohash_bounds(geohash).map(|bounds| bounds.center())
}

/// Wraps a longitude into [-180, 180).
fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Returns the geohashes of the cells surrounding `geohash`.
///
/// The 3×3 grid around the cell is walked from south to north and west to
/// east, skipping the cell itself. Each neighbour is encoded at the input's
/// length.
///
/// Longitudes wrap across the antimeridian. Rows beyond the poles are
/// skipped, so cells touching a pole have only five neighbours.
///
/// # Errors
///
/// Same as [`geohash_bounds`], plus [`GeoError::InvalidPrecision`] for
/// geohashes longer than 12 characters.
///
/// # Examples
///
/// ```
/// use tenerife_geo::geo::geohash_neighbors;
///
/// let neighbors = geohash_neighbors("eth3yjt").unwrap();
/// assert_eq!(neighbors.len(), 8);
/// assert!(neighbors.iter().all(|n| n.len() == 7 && n != "eth3yjt"));
/// ```
pub fn geohash_neighbors(geohash: &str) -> Result<Vec<String>> {
    let bounds = geohash_bounds(geohash)?;
    // Alphabet characters are ASCII, so byte length equals character count.
    let precision = u8::try_from(geohash.len()).unwrap_or(u8::MAX);

    let center = bounds.center();
    let lat_step = bounds.lat_step();
    let lng_step = bounds.lng_step();

    let mut neighbors = Vec::with_capacity(8);
    for d_lat in [-1_i8, 0, 1] {
        let lat = f64::from(d_lat).mul_add(lat_step, center.lat);
        if !(-90.0..=90.0).contains(&lat) {
            continue;
        }
        for d_lng in [-1_i8, 0, 1] {
            if d_lat == 0 && d_lng == 0 {
                continue;
            }
            let lng = wrap_longitude(f64::from(d_lng).mul_add(lng_step, center.lng));
            neighbors.push(encode_geohash(lat, lng, precision)?);
        }
    }

    Ok(neighbors)
}
