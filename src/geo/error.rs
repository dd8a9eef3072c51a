//! Error types for geospatial operations.
//!
//! Coordinate and geohash errors are raised immediately; nothing in this
//! crate clamps, normalizes or returns partial results.

use thiserror::Error;

/// Error type for geohash, bounding-box and index operations.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Latitude outside [-90, 90] (or NaN).
    #[error("Invalid latitude: {0} (expected -90 to 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] (or NaN).
    #[error("Invalid longitude: {0} (expected -180 to 180)")]
    InvalidLongitude(f64),

    /// Character outside the geohash base-32 alphabet.
    #[error("Invalid geohash character '{character}' at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character index within the geohash.
        position: usize,
    },

    /// An empty string was given where a geohash was expected.
    #[error("Geohash must not be empty")]
    EmptyGeohash,

    /// Geohash precision outside 1..=12.
    #[error("Invalid geohash precision: {0} (expected 1 to 12)")]
    InvalidPrecision(u8),

    /// Bounding box rejected by an index search.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geospatial operations.
pub type Result<T> = std::result::Result<T, GeoError>;
