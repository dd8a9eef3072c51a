//! Tenerife Geo Library
//!
//! Geospatial indexing for Tenerife.Music - venues, events and areas.
//! This crate provides geohash encoding, bounding-box helpers and a
//! prefix-range index for "what is near here" queries.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod geo;

pub use geo::{
    calculate_distance, create_bounding_box, decode_geohash, encode_geohash, geohash_bounds,
    geohash_cells_covering_bounding_box, geohash_neighbors, geohash_prefixes_for_bounding_box,
    is_within_bounding_box, BoundingBox, Coordinate, GeoError, GeohashBounds, GeohashIndex,
};
